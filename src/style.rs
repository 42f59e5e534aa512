use crate::document::{Document, NodeId};

/// Style facts that influence inline formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    pub font_weight: Option<u16>,
    pub italic: bool,
    pub text_decoration: Option<String>,
    pub font_family: Option<String>,
}

impl ComputedStyle {
    pub fn is_bold(&self) -> bool {
        self.font_weight.is_some_and(|weight| weight >= 600)
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn is_line_through(&self) -> bool {
        self.text_decoration
            .as_deref()
            .is_some_and(|decoration| decoration.contains("line-through"))
    }

    pub fn is_monospace(&self) -> bool {
        self.font_family
            .as_deref()
            .is_some_and(|family| family.to_ascii_lowercase().contains("monospace"))
    }

    /// Parse a CSS declaration block such as `font-weight:600; font-style: italic`.
    ///
    /// Unknown properties and malformed declarations are ignored.
    pub fn parse_declarations(css: &str) -> Self {
        let mut style = Self::default();
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim().trim_end_matches("!important").trim();
            match property.as_str() {
                "font-weight" => style.font_weight = parse_weight(value),
                "font-style" => {
                    let value = value.to_ascii_lowercase();
                    style.italic = value.starts_with("italic") || value.starts_with("oblique");
                }
                "text-decoration" | "text-decoration-line" => {
                    style.text_decoration = Some(value.to_ascii_lowercase());
                }
                "font-family" => style.font_family = Some(value.to_string()),
                _ => {}
            }
        }
        style
    }
}

fn parse_weight(value: &str) -> Option<u16> {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(700),
        "normal" | "lighter" => Some(400),
        other => other.parse().ok(),
    }
}

/// Capability to read the effective style of a node.
///
/// Returning `None` means no style information is available; callers then
/// fall back to tag-name checks only.
pub trait StyleProbe {
    fn probe(&self, doc: &Document, node: NodeId) -> Option<ComputedStyle>;
}

/// Reads the element's own `style` attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStyleProbe;

impl StyleProbe for InlineStyleProbe {
    fn probe(&self, doc: &Document, node: NodeId) -> Option<ComputedStyle> {
        let css = doc.element(node)?.attr("style")?;
        Some(ComputedStyle::parse_declarations(css))
    }
}

/// Probe for hosts that cannot supply style information.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyleProbe;

impl StyleProbe for NoStyleProbe {
    fn probe(&self, _doc: &Document, _node: NodeId) -> Option<ComputedStyle> {
        None
    }
}
