use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::marker::{Marker, MarkerSet};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub markers: Markers,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Repeated once per nesting level.
    pub indent: String,
    /// Deepest indentation level that is still rendered.
    pub max_depth: usize,
    /// Ceiling on structural recursion, including layout wrappers.
    pub max_nesting: usize,
    /// Code starting with one of these is fenced as `mermaid`.
    pub mermaid_prefixes: Vec<String>,
    /// Prefix for root-relative link targets such as `/Page-1234`.
    pub base_url: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            max_depth: 32,
            max_nesting: 512,
            mermaid_prefixes: vec![
                "flowchart".to_string(),
                "graph".to_string(),
                "sequenceDiagram".to_string(),
            ],
            base_url: None,
        }
    }
}

impl RenderConfig {
    pub fn indent_for(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }
}

/// Structural markers identifying each logical role in the page tree.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Markers {
    pub selectable: MarkerSet,
    pub discussion: MarkerSet,
    pub content_editable: MarkerSet,
    pub text_block: MarkerSet,
    pub inline_code: MarkerSet,
    pub flex_region: MarkerSet,
    pub heading_1: MarkerSet,
    pub heading_2: MarkerSet,
    pub heading_3: MarkerSet,
    pub bulleted_list: MarkerSet,
    pub numbered_list: MarkerSet,
    pub to_do: MarkerSet,
    pub toggle: MarkerSet,
    pub quote: MarkerSet,
    pub callout: MarkerSet,
    pub code: MarkerSet,
    pub divider: MarkerSet,
    pub checkbox: MarkerSet,
    pub icon: MarkerSet,
    pub layout_container: MarkerSet,
    pub page_block: MarkerSet,
    pub page_title: MarkerSet,
}

impl Default for Markers {
    fn default() -> Self {
        let class = |name: &str| MarkerSet::from(Marker::class(name));
        Self {
            selectable: class("notion-selectable"),
            discussion: class("notion-margin-discussion-item"),
            content_editable: Marker::attr_eq("contenteditable", "true").into(),
            text_block: class("notion-text-block"),
            inline_code: class("notion-inline-code"),
            flex_region: Marker::attr_contains("style", "flex-grow").into(),
            heading_1: class("notion-header-block"),
            heading_2: class("notion-sub_header-block"),
            heading_3: class("notion-sub_sub_header-block"),
            bulleted_list: class("notion-bulleted_list-block"),
            numbered_list: class("notion-numbered_list-block"),
            to_do: class("notion-to_do-block"),
            toggle: class("notion-toggle-block"),
            quote: class("notion-quote-block"),
            callout: class("notion-callout-block"),
            code: class("notion-code-block"),
            divider: class("notion-divider-block"),
            checkbox: MarkerSet::any([
                Marker::tag("input").and_attr_eq("type", "checkbox"),
                Marker::attr_eq("role", "checkbox"),
            ]),
            icon: class("notion-record-icon"),
            layout_container: class("layout-content"),
            page_block: class("notion-page-block"),
            page_title: Marker::tag("h1").into(),
        }
    }
}

impl Config {
    /// The configuration shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            config_path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            config_path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
