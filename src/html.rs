use kuchiki::traits::*;
use kuchiki::{NodeData, NodeRef};

use crate::document::{Document, Element, NodeId};

/// Elements whose content never reaches the Markdown output.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Build a [`Document`] from an HTML snapshot of a page.
///
/// The `<title>` text becomes the document title. Comments, doctypes and
/// script-like elements are dropped; whitespace text is kept because it
/// separates inline spans.
pub fn parse_document(html: &str) -> Document {
    let dom = kuchiki::parse_html().one(html);
    let mut doc = Document::new();
    let mut stack: Vec<(NodeRef, NodeId)> = Vec::new();
    push_children(&mut stack, &dom, doc.root());

    while let Some((node, parent)) = stack.pop() {
        match node.data() {
            NodeData::Element(data) => {
                let tag = data.name.local.to_string().to_ascii_lowercase();
                if SKIPPED_TAGS.contains(&tag.as_str()) {
                    continue;
                }
                if tag == "title" {
                    if doc.title().is_none() {
                        doc.set_title(node.text_contents().trim());
                    }
                    continue;
                }
                let mut element = Element::new(&tag);
                for (name, attr) in data.attributes.borrow().map.iter() {
                    element = element.with_attr(&name.local, &attr.value);
                }
                let id = doc.append_element(parent, element);
                push_children(&mut stack, &node, id);
            }
            NodeData::Text(text) => {
                doc.append_text(parent, &text.borrow());
            }
            NodeData::Document(_) | NodeData::DocumentFragment => {
                push_children(&mut stack, &node, parent);
            }
            _ => {}
        }
    }
    doc
}

/// Queue children so they pop in document order.
fn push_children(stack: &mut Vec<(NodeRef, NodeId)>, node: &NodeRef, parent: NodeId) {
    let children: Vec<NodeRef> = node.children().collect();
    stack.extend(children.into_iter().rev().map(|child| (child, parent)));
}
