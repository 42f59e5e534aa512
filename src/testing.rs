//! Builders for Notion-shaped page trees used across unit tests.

use crate::document::{Document, Element, NodeId};

pub(crate) const FLEX_STYLE: &str = "flex: 1 1 0px; min-width: 1px; flex-grow: 1";

/// A page with a title region and an empty body region.
pub(crate) struct Page {
    pub doc: Document,
    pub body: NodeId,
}

impl Page {
    pub fn new(title: &str) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let title_region = doc.append_element(root, Element::new("div").with_class("layout-content"));
        let page_block = doc.append_element(
            title_region,
            Element::new("div").with_class("notion-selectable notion-page-block"),
        );
        let heading = doc.append_element(
            page_block,
            Element::new("h1").with_attr("contenteditable", "true"),
        );
        doc.append_text(heading, title);

        let body_region = doc.append_element(root, Element::new("div").with_class("layout-content"));
        let body = doc.append_element(body_region, Element::new("div").with_class("notion-page-content"));
        Self { doc, body }
    }

    /// A block whose row holds a flex region with the editable text.
    pub fn block(&mut self, parent: NodeId, class: &str, text: &str) -> NodeId {
        let (block, _) = self.block_with_row(parent, class, text);
        block
    }

    /// Like [`Page::block`], also returning the flex region inside the row.
    pub fn block_with_row(&mut self, parent: NodeId, class: &str, text: &str) -> (NodeId, NodeId) {
        let block = bare_block(&mut self.doc, parent, class);
        let row = self
            .doc
            .append_element(block, Element::new("div").with_attr("style", "display: flex"));
        let bullet = self.doc.append_element(row, Element::new("div"));
        self.doc.append_text(bullet, "•");
        let flex = self
            .doc
            .append_element(row, Element::new("div").with_attr("style", FLEX_STYLE));
        self.editable(flex, text);
        (block, flex)
    }

    pub fn editable(&mut self, parent: NodeId, text: &str) -> NodeId {
        let carrier = self.doc.append_element(
            parent,
            Element::new("div").with_attr("contenteditable", "true"),
        );
        self.doc.append_text(carrier, text);
        carrier
    }

    /// Wrapper holding nested blocks, placed next to the block's row.
    pub fn children(&mut self, block: NodeId) -> NodeId {
        self.doc.append_element(
            block,
            Element::new("div").with_attr("style", "display: flex; flex-direction: column"),
        )
    }

    pub fn todo(&mut self, parent: NodeId, text: &str, checkbox_attr: Option<(&str, &str)>) -> NodeId {
        let block = bare_block(&mut self.doc, parent, "notion-to_do-block");
        let row = self.doc.append_element(block, Element::new("div"));
        let mut checkbox = Element::new("input").with_attr("type", "checkbox");
        if let Some((name, value)) = checkbox_attr {
            checkbox = checkbox.with_attr(name, value);
        }
        self.doc.append_element(row, checkbox);
        let flex = self
            .doc
            .append_element(row, Element::new("div").with_attr("style", FLEX_STYLE));
        self.editable(flex, text);
        block
    }

    pub fn code(&mut self, parent: NodeId, code: &str) -> NodeId {
        let block = bare_block(&mut self.doc, parent, "notion-code-block");
        let frame = self.doc.append_element(block, Element::new("div"));
        let carrier = self.doc.append_element(
            frame,
            Element::new("div").with_attr("contenteditable", "true"),
        );
        let code_el = self.doc.append_element(carrier, Element::new("code"));
        self.doc.append_text(code_el, code);
        block
    }

    /// Callout with an optional icon given as (`img` | `span`, glyph).
    pub fn callout(&mut self, parent: NodeId, text: &str, icon: Option<(&str, &str)>) -> NodeId {
        let block = bare_block(&mut self.doc, parent, "notion-callout-block");
        let row = self.doc.append_element(block, Element::new("div"));
        if let Some((tag, glyph)) = icon {
            let holder = self
                .doc
                .append_element(row, Element::new("div").with_class("notion-record-icon"));
            if tag == "img" {
                self.doc
                    .append_element(holder, Element::new("img").with_attr("alt", glyph));
            } else {
                let span = self.doc.append_element(holder, Element::new(tag));
                self.doc.append_text(span, glyph);
            }
        }
        let flex = self
            .doc
            .append_element(row, Element::new("div").with_attr("style", FLEX_STYLE));
        self.editable(flex, text);
        block
    }

    pub fn markdown(&self) -> String {
        crate::extract(&self.doc)
    }
}

/// A selectable block element with no content.
pub(crate) fn bare_block(doc: &mut Document, parent: NodeId, class: &str) -> NodeId {
    doc.append_element(
        parent,
        Element::new("div").with_class(&format!("notion-selectable {class}")),
    )
}
