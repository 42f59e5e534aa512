use std::collections::HashSet;

use tracing::debug;

use crate::converter::Converter;
use crate::document::NodeId;

/// Traversal state for one conversion pass.
///
/// `depth` is the indentation level of the blocks being emitted; `visited`
/// makes every element render at most once even when the tree links it
/// from several places.
#[derive(Debug, Default)]
pub struct RenderContext {
    pub depth: usize,
    visited: HashSet<NodeId>,
    nesting: usize,
    list_open: bool,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }

    /// Claim `node` for rendering. Returns `false` when it was seen before or
    /// a ceiling is exceeded; in that case nothing may be rendered for it.
    pub(crate) fn enter(&mut self, node: NodeId, max_depth: usize, max_nesting: usize) -> bool {
        if self.depth > max_depth || self.nesting >= max_nesting {
            debug!(?node, depth = self.depth, nesting = self.nesting, "depth ceiling reached");
            return false;
        }
        if !self.visited.insert(node) {
            debug!(?node, "skipping already rendered node");
            return false;
        }
        self.nesting += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Run `f` with the indentation depth temporarily set to `depth`.
    pub(crate) fn with_depth<R>(&mut self, depth: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.depth, depth);
        let result = f(self);
        self.depth = saved;
        result
    }

    /// Remember that a top-level list run is in progress.
    pub(crate) fn open_list(&mut self) {
        if self.depth == 0 {
            self.list_open = true;
        }
    }

    /// End a top-level list run with a blank line. Text nested under a list
    /// item continues the run.
    pub(crate) fn close_list(&mut self, out: &mut String) {
        if self.depth != 0 {
            return;
        }
        if self.list_open && !out.ends_with("\n\n") {
            out.push('\n');
        }
        self.list_open = false;
    }
}

impl Converter<'_> {
    /// Render everything below the layout node `node`.
    pub fn walk(&self, node: NodeId, ctx: &mut RenderContext) -> String {
        let mut out = String::new();
        self.walk_into(node, ctx, &mut out);
        out
    }

    pub(crate) fn walk_into(&self, node: NodeId, ctx: &mut RenderContext, out: &mut String) {
        let render = self.render();
        if !ctx.enter(node, render.max_depth, render.max_nesting) {
            return;
        }
        self.walk_children(node, ctx, out);
        ctx.leave();
    }

    /// Hand block children to the emitter and descend into layout wrappers.
    pub(crate) fn walk_children(&self, node: NodeId, ctx: &mut RenderContext, out: &mut String) {
        for &child in self.doc.children(node) {
            if self.doc.element(child).is_none() || self.is_discussion(child) {
                continue;
            }
            if self.is_block(child) {
                self.emit_into(child, ctx, out);
            } else {
                self.walk_into(child, ctx, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::Element;
    use crate::testing::Page;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "notion-text-block";

    #[test]
    fn descends_through_layout_wrappers() {
        let mut page = Page::new("T");
        let outer = page.doc.append_element(page.body, Element::new("div"));
        let inner = page.doc.append_element(outer, Element::new("div"));
        page.block(inner, TEXT, "deep");
        page.block(page.body, TEXT, "shallow");

        let config = Config::default();
        let mut ctx = RenderContext::new();
        assert_eq!(
            Converter::new(&page.doc, &config).walk(page.body, &mut ctx),
            "deep\n\nshallow\n\n"
        );
    }

    #[test]
    fn skips_discussion_artifacts() {
        let mut page = Page::new("T");
        let comment = page.doc.append_element(
            page.body,
            Element::new("div").with_class("notion-margin-discussion-item"),
        );
        page.block(comment, TEXT, "a comment");
        page.block(page.body, TEXT, "body");

        let config = Config::default();
        let mut ctx = RenderContext::new();
        assert_eq!(
            Converter::new(&page.doc, &config).walk(page.body, &mut ctx),
            "body\n\n"
        );
    }

    #[test]
    fn back_reference_renders_once() {
        let mut page = Page::new("T");
        let wrapper = page.doc.append_element(page.body, Element::new("div"));
        let shared = page.block(wrapper, TEXT, "shared");
        page.doc.append_child(page.body, shared);
        page.doc.append_child(wrapper, page.body);

        let config = Config::default();
        let mut ctx = RenderContext::new();
        let out = Converter::new(&page.doc, &config).walk(page.body, &mut ctx);
        assert_eq!(out, "shared\n\n");
        assert!(ctx.is_visited(shared));
    }

    #[test]
    fn visited_node_yields_nothing() {
        let mut page = Page::new("T");
        page.block(page.body, TEXT, "once");

        let config = Config::default();
        let converter = Converter::new(&page.doc, &config);
        let mut ctx = RenderContext::new();
        assert_eq!(converter.walk(page.body, &mut ctx), "once\n\n");
        assert_eq!(converter.walk(page.body, &mut ctx), "");
    }

    #[test]
    fn nesting_ceiling_truncates() {
        let mut page = Page::new("T");
        let mut parent = page.body;
        for _ in 0..20 {
            parent = page.doc.append_element(parent, Element::new("div"));
        }
        page.block(parent, TEXT, "too deep");

        let mut config = Config::default();
        config.render.max_nesting = 10;
        let mut ctx = RenderContext::new();
        assert_eq!(
            Converter::new(&page.doc, &config).walk(page.body, &mut ctx),
            ""
        );
    }

    #[test]
    fn depth_is_restored() {
        let mut ctx = RenderContext::at_depth(1);
        let inner = ctx.with_depth(3, |ctx| ctx.depth);
        assert_eq!(inner, 3);
        assert_eq!(ctx.depth, 1);
    }
}
