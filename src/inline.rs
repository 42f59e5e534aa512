use std::collections::HashSet;

use tracing::trace;

use crate::converter::Converter;
use crate::document::{Element, Node, NodeId};

const BOLD_TAGS: &[&str] = &["b", "strong"];
const ITALIC_TAGS: &[&str] = &["i", "em"];
const STRIKE_TAGS: &[&str] = &["s", "strike", "del"];
const CODE_TAGS: &[&str] = &["code"];

impl Converter<'_> {
    /// Render the subtree at `node` as inline Markdown.
    ///
    /// Never fails: missing nodes, missing style information and cycles all
    /// degrade to less (or no) formatting.
    pub fn format_inline(&self, node: NodeId) -> String {
        let mut path = HashSet::new();
        self.format_node(node, &mut path)
    }

    fn format_node(&self, node: NodeId, path: &mut HashSet<NodeId>) -> String {
        let el = match self.doc.node(node) {
            Some(Node::Text(text)) => return text.clone(),
            Some(Node::Element(el)) => el,
            None => return String::new(),
        };
        if self.markers().discussion.matches(el) {
            return String::new();
        }
        // `path` holds the ancestors being formatted; revisiting one is a cycle.
        if path.len() >= self.render().max_nesting || !path.insert(node) {
            trace!(?node, depth = path.len(), "inline formatting cut off");
            return String::new();
        }
        let mut content = String::new();
        for &child in &el.children {
            content.push_str(&self.format_node(child, path));
        }
        path.remove(&node);

        if content.trim().is_empty() {
            return content;
        }
        self.apply_marks(node, el, content)
    }

    fn apply_marks(&self, node: NodeId, el: &Element, content: String) -> String {
        let style = self.probe.probe(self.doc, node).unwrap_or_default();
        let tag = el.tag.as_str();

        let mut content = content;
        if BOLD_TAGS.contains(&tag) || style.is_bold() {
            content = wrap(content, "**");
        }
        if ITALIC_TAGS.contains(&tag) || style.is_italic() {
            content = wrap(content, "_");
        }
        if STRIKE_TAGS.contains(&tag) || style.is_line_through() {
            content = wrap(content, "~");
        }
        if CODE_TAGS.contains(&tag)
            || style.is_monospace()
            || self.markers().inline_code.matches(el)
        {
            content = wrap(content, "`");
        }
        if tag == "a" {
            if let Some(target) = self.link_target(el) {
                let (lead, core, trail) = split_edges(&content);
                content = format!("{lead}[{core}]({target}){trail}");
            }
        }
        content
    }

    fn link_target(&self, el: &Element) -> Option<String> {
        let href = el.attr("href")?.trim();
        if href.is_empty() || href.starts_with("javascript:") {
            return None;
        }
        match &self.render().base_url {
            Some(base) if href.starts_with('/') && !href.starts_with("//") => {
                Some(format!("{}{}", base.trim_end_matches('/'), href))
            }
            _ => Some(href.to_string()),
        }
    }
}

/// Surround the non-blank core of `content` with `marker`, leaving outer
/// whitespace outside. Content already wrapped in `marker` is returned as is.
fn wrap(content: String, marker: &str) -> String {
    let (lead, core, trail) = split_edges(&content);
    if core.len() >= 2 * marker.len() && core.starts_with(marker) && core.ends_with(marker) {
        return content;
    }
    format!("{lead}{marker}{core}{marker}{trail}")
}

/// Leading whitespace, trimmed core, trailing whitespace.
fn split_edges(content: &str) -> (&str, &str, &str) {
    let start = content.len() - content.trim_start().len();
    let end = content.trim_end().len().max(start);
    (&content[..start], &content[start..end], &content[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::Document;
    use crate::style::NoStyleProbe;
    use pretty_assertions::assert_eq;

    fn span(doc: &mut Document, parent: NodeId, el: Element, text: &str) -> NodeId {
        let id = doc.append_element(parent, el);
        doc.append_text(id, text);
        id
    }

    #[test]
    fn text_is_returned_raw() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.append_text(root, "  spaced  ");
        let config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(text), "  spaced  ");
    }

    #[test]
    fn tags_and_styles() {
        let mut doc = Document::new();
        let root = doc.root();
        let line = doc.append_element(root, Element::new("div"));
        doc.append_text(line, "Plain ");
        span(&mut doc, line, Element::new("b"), "bold");
        doc.append_text(line, ", ");
        span(&mut doc, line, Element::new("span").with_attr("style", "font-style:italic"), "slanted");
        doc.append_text(line, ", ");
        span(&mut doc, line, Element::new("span").with_attr("style", "text-decoration:line-through"), "gone");
        doc.append_text(line, " and ");
        span(&mut doc, line, Element::new("span").with_class("notion-inline-code"), "x = 1");

        let config = Config::default();
        assert_eq!(
            Converter::new(&doc, &config).format_inline(line),
            "Plain **bold**, _slanted_, ~gone~ and `x = 1`"
        );
    }

    #[test]
    fn style_rules_need_a_probe() {
        let mut doc = Document::new();
        let root = doc.root();
        let heavy = span(&mut doc, root, Element::new("span").with_attr("style", "font-weight:600"), "heavy");
        let strong = span(&mut doc, root, Element::new("strong"), "strong");

        let config = Config::default();
        let converter = Converter::new(&doc, &config).with_style_probe(&NoStyleProbe);
        assert_eq!(converter.format_inline(heavy), "heavy");
        assert_eq!(converter.format_inline(strong), "**strong**");
    }

    #[test]
    fn same_mark_is_not_applied_twice() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, Element::new("span").with_attr("style", "font-weight:700"));
        span(&mut doc, outer, Element::new("strong"), "loud");

        let config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(outer), "**loud**");
    }

    #[test]
    fn whitespace_stays_outside_marks() {
        let mut doc = Document::new();
        let root = doc.root();
        let line = doc.append_element(root, Element::new("div"));
        span(&mut doc, line, Element::new("b"), "Buy ");
        doc.append_text(line, "milk");

        let config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(line), "**Buy** milk");
    }

    #[test]
    fn links_wrap_formatted_content() {
        let mut doc = Document::new();
        let root = doc.root();
        let link = doc.append_element(root, Element::new("a").with_attr("href", "/Page-abc"));
        span(&mut doc, link, Element::new("em"), "docs");
        let bare = doc.append_element(root, Element::new("a"));
        doc.append_text(bare, "no target");

        let mut config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(link), "[_docs_](/Page-abc)");
        assert_eq!(Converter::new(&doc, &config).format_inline(bare), "no target");

        config.render.base_url = Some("https://www.notion.so/".to_string());
        assert_eq!(
            Converter::new(&doc, &config).format_inline(link),
            "[_docs_](https://www.notion.so/Page-abc)"
        );
    }

    #[test]
    fn link_keeps_surrounding_spaces() {
        let mut doc = Document::new();
        let root = doc.root();
        let line = doc.append_element(root, Element::new("div"));
        doc.append_text(line, "Read the");
        span(&mut doc, line, Element::new("a").with_attr("href", "/x"), " docs ");
        doc.append_text(line, "now");

        let config = Config::default();
        assert_eq!(
            Converter::new(&doc, &config).format_inline(line),
            "Read the [docs](/x) now"
        );
    }

    #[test]
    fn empty_content_is_not_wrapped() {
        let mut doc = Document::new();
        let root = doc.root();
        let empty = span(&mut doc, root, Element::new("b"), "  ");
        let config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(empty), "  ");
    }

    #[test]
    fn discussion_artifacts_are_dropped() {
        let mut doc = Document::new();
        let root = doc.root();
        let line = doc.append_element(root, Element::new("div"));
        doc.append_text(line, "kept");
        span(
            &mut doc,
            line,
            Element::new("div").with_class("notion-margin-discussion-item"),
            "comment",
        );

        let config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(line), "kept");
    }

    #[test]
    fn cycles_terminate() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, Element::new("span"));
        let inner = span(&mut doc, outer, Element::new("b"), "loop");
        doc.append_child(inner, outer);

        let config = Config::default();
        assert_eq!(Converter::new(&doc, &config).format_inline(outer), "**loop**");
    }

    #[test]
    fn wrap_is_idempotent() {
        for marker in ["**", "_", "~", "`"] {
            let once = wrap("text".to_string(), marker);
            assert_eq!(wrap(once.clone(), marker), once);
        }
    }
}
