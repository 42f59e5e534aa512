use crate::document::NodeId;

/// What a selectable block renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    BulletedListItem,
    NumberedListItem,
    TodoItem { checked: bool },
    ToggleItem,
    Quote,
    Callout { icon: String },
    CodeBlock { language: Option<String> },
    Divider,
    GenericText,
    /// Grouping or layout node; only its nested blocks are rendered.
    NotABlock,
}

impl BlockKind {
    /// Bulleted, numbered and to-do items form Markdown lists.
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            Self::BulletedListItem | Self::NumberedListItem | Self::TodoItem { .. }
        )
    }
}

/// A block's own text and the nodes holding its nested child blocks.
///
/// The two are disjoint: nothing in `nested` lies inside the content carrier
/// that produced `own_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContent {
    pub own_text: String,
    pub carrier: Option<NodeId>,
    /// Block nodes, or wrappers that contain block nodes, in document order.
    pub nested: Vec<NodeId>,
}

/// A classified block together with its located content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub own_text: String,
    pub nested: Vec<NodeId>,
}

impl Block {
    pub fn new(kind: BlockKind, content: BlockContent) -> Self {
        Self {
            kind,
            own_text: content.own_text,
            nested: content.nested,
        }
    }
}
