use tracing::trace;

use crate::block::BlockKind;
use crate::converter::Converter;
use crate::document::NodeId;

const MERMAID: &str = "mermaid";

impl Converter<'_> {
    /// Decide which block kind `node` represents.
    ///
    /// First match wins, in a fixed order: divider, headings, list family,
    /// code, quote, callout, toggle, then plain text when the node has own
    /// text. Anything else is a grouping node.
    pub fn classify(&self, node: NodeId) -> BlockKind {
        let Some(el) = self.doc.element(node) else {
            return BlockKind::NotABlock;
        };
        let m = self.markers();

        let kind = if m.divider.matches(el) {
            BlockKind::Divider
        } else if m.heading_1.matches(el) {
            BlockKind::Heading(1)
        } else if m.heading_2.matches(el) {
            BlockKind::Heading(2)
        } else if m.heading_3.matches(el) {
            BlockKind::Heading(3)
        } else if m.bulleted_list.matches(el) {
            BlockKind::BulletedListItem
        } else if m.numbered_list.matches(el) {
            BlockKind::NumberedListItem
        } else if m.to_do.matches(el) {
            BlockKind::TodoItem {
                checked: self.is_checked(node),
            }
        } else if m.code.matches(el) {
            BlockKind::CodeBlock {
                language: self.code_language(&self.code_text(node)),
            }
        } else if m.quote.matches(el) {
            BlockKind::Quote
        } else if m.callout.matches(el) {
            BlockKind::Callout {
                icon: self.callout_icon(node),
            }
        } else if m.toggle.matches(el) {
            BlockKind::ToggleItem
        } else if self.has_own_text(node) {
            BlockKind::GenericText
        } else {
            BlockKind::NotABlock
        };

        trace!(?node, ?kind, classes = ?el.classes, "classified block");
        kind
    }

    fn has_own_text(&self, node: NodeId) -> bool {
        self.content_carrier(node)
            .is_some_and(|carrier| !self.doc.text_content(carrier).trim().is_empty())
    }

    fn is_checked(&self, node: NodeId) -> bool {
        let Some(checkbox) = self.find_own(node, |id| self.is(id, |m| &m.checkbox)) else {
            return false;
        };
        let Some(el) = self.doc.element(checkbox) else {
            return false;
        };
        el.attr("checked").is_some_and(|v| !v.eq_ignore_ascii_case("false"))
            || el.attr("aria-checked") == Some("true")
    }

    /// Unformatted code of a code block: the `code` element, else the content
    /// carrier, else the whole block.
    pub(crate) fn code_text(&self, node: NodeId) -> String {
        let source = self
            .find_own(node, |id| {
                self.doc.element(id).is_some_and(|el| el.tag == "code")
            })
            .or_else(|| self.content_carrier(node))
            .unwrap_or(node);
        self.doc.text_content(source)
    }

    fn code_language(&self, code: &str) -> Option<String> {
        let code = code.trim_start();
        self.render()
            .mermaid_prefixes
            .iter()
            .any(|prefix| code.starts_with(prefix.as_str()))
            .then(|| MERMAID.to_string())
    }

    /// Alt text or text of the first image or span inside the icon marker.
    fn callout_icon(&self, node: NodeId) -> String {
        let Some(icon) = self.find_own(node, |id| self.is(id, |m| &m.icon)) else {
            return String::new();
        };
        let is_glyph = |id: NodeId| {
            self.doc
                .element(id)
                .is_some_and(|el| el.tag == "img" || el.tag == "span")
        };
        let glyph = if is_glyph(icon) {
            Some(icon)
        } else {
            self.doc.descendants(icon).find(|&id| is_glyph(id))
        };
        let Some(glyph) = glyph else {
            return String::new();
        };
        match self.doc.element(glyph).and_then(|el| el.attr("alt")) {
            Some(alt) if !alt.trim().is_empty() => alt.trim().to_string(),
            _ => self.doc.text_content(glyph).trim().to_string(),
        }
    }
}
