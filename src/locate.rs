use crate::block::{Block, BlockContent};
use crate::converter::Converter;
use crate::document::NodeId;

/// Parent hops allowed when climbing from the content carrier to the row.
const MAX_ROW_HOPS: usize = 64;

impl Converter<'_> {
    /// Classify `node` and locate its content in one go.
    pub fn block(&self, node: NodeId) -> Block {
        Block::new(self.classify(node), self.locate(node))
    }

    /// Split a block into its own text and the nodes holding nested blocks.
    ///
    /// The tree has no field naming a block's children, so ownership is
    /// inferred. The *row* is the direct child of `node` that holds the
    /// content carrier. Nested blocks are the other direct children that are
    /// (or contain) blocks; only when there are none, blocks found inside the
    /// row's flex region next to the carrier are used instead. Nothing inside
    /// the carrier is ever returned as nested.
    pub fn locate(&self, node: NodeId) -> BlockContent {
        let carrier = self.content_carrier(node);
        let own_text = carrier
            .map(|carrier| self.format_inline(carrier).trim().to_string())
            .unwrap_or_default();
        let row = carrier.and_then(|carrier| self.row_of(node, carrier));

        let mut nested = self.sibling_blocks(node, row);
        if nested.is_empty() {
            if let (Some(row), Some(carrier)) = (row, carrier) {
                nested = self.blocks_beside_carrier(row, carrier);
            }
        }
        if let Some(carrier) = carrier {
            nested.retain(|&id| {
                !self.doc.subtree_contains(id, carrier) && !self.doc.subtree_contains(carrier, id)
            });
        }

        BlockContent {
            own_text,
            carrier,
            nested,
        }
    }

    /// The first editable-text descendant, else the first text-block
    /// descendant, not counting anything inside nested blocks. A text-block
    /// that is itself a block is a child, not a carrier.
    pub(crate) fn content_carrier(&self, node: NodeId) -> Option<NodeId> {
        self.find_own(node, |id| self.is(id, |m| &m.content_editable))
            .or_else(|| {
                self.find_own(node, |id| {
                    self.is(id, |m| &m.text_block) && !self.is_block(id)
                })
            })
    }

    /// Climb from `carrier` to the direct child of `node` containing it.
    /// Falls back to the first element child when the climb does not arrive.
    fn row_of(&self, node: NodeId, carrier: NodeId) -> Option<NodeId> {
        let mut current = carrier;
        for _ in 0..MAX_ROW_HOPS {
            match self.doc.parent(current) {
                Some(parent) if parent == node => return Some(current),
                Some(parent) => current = parent,
                None => break,
            }
        }
        self.doc
            .children(node)
            .iter()
            .copied()
            .find(|&child| self.doc.element(child).is_some())
    }

    /// Direct children of `node` other than the row that are blocks or
    /// wrap blocks.
    fn sibling_blocks(&self, node: NodeId, row: Option<NodeId>) -> Vec<NodeId> {
        self.doc
            .children(node)
            .iter()
            .copied()
            .filter(|&child| Some(child) != row)
            .filter(|&child| self.doc.element(child).is_some() && !self.is_discussion(child))
            .filter(|&child| self.contains_block(child))
            .collect()
    }

    /// Blocks sharing the content-bearing region of the row with the carrier.
    ///
    /// The region is the closest ancestor of the carrier within the row that
    /// carries the flex-region marker, or the row itself.
    fn blocks_beside_carrier(&self, row: NodeId, carrier: NodeId) -> Vec<NodeId> {
        let region = self.flex_region(row, carrier).unwrap_or(row);
        let mut found = Vec::new();
        let mut iter = self.doc.descendants(region);
        while let Some(id) = iter.next() {
            if id == carrier || self.is_discussion(id) {
                iter.skip_subtree();
            } else if self.is_block(id) {
                found.push(id);
                iter.skip_subtree();
            }
        }
        found
    }

    fn flex_region(&self, row: NodeId, carrier: NodeId) -> Option<NodeId> {
        if carrier == row {
            return None;
        }
        let mut current = self.doc.parent(carrier)?;
        for _ in 0..MAX_ROW_HOPS {
            if self.is(current, |m| &m.flex_region) {
                return Some(current);
            }
            if current == row {
                return None;
            }
            current = self.doc.parent(current)?;
        }
        None
    }
}
