use crate::config::{Config, Markers, RenderConfig};
use crate::document::{Document, NodeId};
use crate::marker::MarkerSet;
use crate::style::{InlineStyleProbe, StyleProbe};

/// Converts one page tree into Markdown.
///
/// Holds only borrowed, read-only state; all traversal state lives in a
/// [`RenderContext`](crate::RenderContext) created per call.
pub struct Converter<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) config: &'a Config,
    pub(crate) probe: &'a dyn StyleProbe,
}

impl<'a> Converter<'a> {
    pub fn new(doc: &'a Document, config: &'a Config) -> Self {
        Self {
            doc,
            config,
            probe: &InlineStyleProbe,
        }
    }

    /// Use a different source of style information.
    pub fn with_style_probe(mut self, probe: &'a dyn StyleProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub(crate) fn markers(&self) -> &'a Markers {
        &self.config.markers
    }

    pub(crate) fn render(&self) -> &'a RenderConfig {
        &self.config.render
    }

    /// Whether `node` is an element carrying `marker`.
    pub(crate) fn is(&self, node: NodeId, marker: impl Fn(&Markers) -> &MarkerSet) -> bool {
        self.doc
            .element(node)
            .is_some_and(|el| marker(self.markers()).matches(el))
    }

    pub(crate) fn is_block(&self, node: NodeId) -> bool {
        self.is(node, |m| &m.selectable)
    }

    pub(crate) fn is_discussion(&self, node: NodeId) -> bool {
        self.is(node, |m| &m.discussion)
    }

    /// First descendant of `node` satisfying `pred`, without entering nested
    /// blocks or discussion artifacts.
    pub(crate) fn find_own(&self, node: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        let mut iter = self.doc.descendants(node);
        while let Some(id) = iter.next() {
            if self.is_discussion(id) {
                iter.skip_subtree();
                continue;
            }
            if pred(id) {
                return Some(id);
            }
            if self.is_block(id) {
                iter.skip_subtree();
            }
        }
        None
    }

    /// Whether any block lives at or below `node`.
    pub(crate) fn contains_block(&self, node: NodeId) -> bool {
        if self.is_block(node) {
            return true;
        }
        let mut iter = self.doc.descendants(node);
        while let Some(id) = iter.next() {
            if self.is_discussion(id) {
                iter.skip_subtree();
            } else if self.is_block(id) {
                return true;
            }
        }
        false
    }
}
