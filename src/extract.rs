use tracing::{debug, warn};

use crate::converter::Converter;
use crate::document::NodeId;
use crate::walk::RenderContext;

/// Returned in place of Markdown when the page has no layout container.
pub const NO_CONTENT: &str = "Error: No content found";

impl Converter<'_> {
    /// Convert the whole page into `# Title\n\n<body>`.
    ///
    /// With two or more layout containers the first is the title region and
    /// the second the body. With a single container the title is looked up
    /// elsewhere on the page.
    pub fn extract(&self) -> String {
        let root = self.doc.root();
        let containers: Vec<NodeId> = self
            .doc
            .descendants(root)
            .filter(|&id| self.is(id, |m| &m.layout_container))
            .collect();

        let (title, body) = match containers.as_slice() {
            [] => {
                warn!("no layout container found");
                return NO_CONTENT.to_string();
            }
            [body] => (self.fallback_title(), *body),
            [title_region, body, ..] => (self.region_title(*title_region), *body),
        };
        debug!(containers = containers.len(), %title, "extracting page");

        let mut ctx = RenderContext::new();
        let mut out = format!("# {title}\n\n");
        self.walk_into(body, &mut ctx, &mut out);
        ctx.close_list(&mut out);
        out
    }

    /// Editable text anywhere in the title region, page blocks included,
    /// else the region's raw text.
    fn region_title(&self, region: NodeId) -> String {
        let mut editable = None;
        let mut iter = self.doc.descendants(region);
        while let Some(id) = iter.next() {
            if self.is_discussion(id) {
                iter.skip_subtree();
            } else if self.is(id, |m| &m.content_editable) {
                editable = Some(id);
                break;
            }
        }
        self.doc
            .text_content(editable.unwrap_or(region))
            .trim()
            .to_string()
    }

    /// First page-title heading inside a page block, else the document title.
    fn fallback_title(&self) -> String {
        let root = self.doc.root();
        self.doc
            .descendants(root)
            .filter(|&id| self.is(id, |m| &m.page_block))
            .find_map(|page| {
                self.doc
                    .descendants(page)
                    .find(|&id| self.is(id, |m| &m.page_title))
            })
            .map(|heading| self.doc.text_content(heading))
            .or_else(|| self.doc.title().map(str::to_string))
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}
