mod block;
mod classify;
mod config;
mod converter;
mod document;
mod emit;
mod extract;
pub mod html;
mod inline;
mod locate;
mod marker;
mod style;
mod walk;

#[cfg(test)]
mod testing;

pub use block::{Block, BlockContent, BlockKind};
pub use config::{Config, ConfigError, Markers, RenderConfig};
pub use converter::Converter;
pub use document::{Descendants, Document, Element, Node, NodeId};
pub use extract::NO_CONTENT;
pub use marker::{Marker, MarkerError, MarkerSet};
pub use style::{ComputedStyle, InlineStyleProbe, NoStyleProbe, StyleProbe};
pub use walk::RenderContext;

/// Convert a page tree to Markdown using default config.
pub fn extract(doc: &Document) -> String {
    extract_with_config(doc, &Config::compiled_default())
}

/// Convert a page tree to Markdown with custom config.
pub fn extract_with_config(doc: &Document, config: &Config) -> String {
    Converter::new(doc, config).extract()
}

/// Convert an HTML snapshot of a page to Markdown using default config.
pub fn html_to_markdown(html: &str) -> String {
    html_to_markdown_with_config(html, &Config::compiled_default())
}

/// Convert an HTML snapshot of a page to Markdown with custom config.
pub fn html_to_markdown_with_config(html: &str, config: &Config) -> String {
    let doc = html::parse_document(html);
    extract_with_config(&doc, config)
}
