use std::collections::{BTreeMap, HashSet};

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A node in the page tree
#[derive(Debug, Clone)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// An element with its tag, classes and attributes.
///
/// `classes` mirrors the whitespace-separated `class` attribute, which is also
/// kept in `attributes` so attribute markers can match against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        for class in class.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
        self.attributes
            .insert("class".to_string(), self.classes.join(" "));
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            return self.with_class(value);
        }
        let mut element = self;
        element.attributes.insert(name, value.to_string());
        element
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Read-only page tree stored as an arena.
///
/// Every document owns a synthetic root element. Children are stored as ids,
/// so the same node may be linked under several parents; traversals guard
/// against the resulting back-references.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    title: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Element(Element::new("#document"))],
            title: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Page-level title, e.g. the HTML `<title>`.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append a new element under `parent` and return its id.
    pub fn append_element(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        element.parent = Some(parent);
        element.children.clear();
        self.push(parent, Node::Element(element))
    }

    /// Append a text node under `parent` and return its id.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, Node::Text(text.to_string()))
    }

    /// Link an existing node as an additional child of `parent`.
    ///
    /// The node keeps its original parent, so this creates a back-reference
    /// rather than moving it.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child.0 >= self.nodes.len() {
            return;
        }
        if let Some(Node::Element(el)) = self.nodes.get_mut(parent.0) {
            el.children.push(child);
        }
    }

    fn push(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Some(Node::Element(el)) = self.nodes.get_mut(parent.0) {
            el.children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id.0) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map_or(&[], |el| el.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|el| el.parent)
    }

    /// Pre-order iterator over the descendants of `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut seen = HashSet::new();
        seen.insert(id);
        Descendants {
            doc: self,
            stack: self.children(id).iter().rev().copied().collect(),
            seen,
            last: None,
        }
    }

    /// Concatenated raw text of `id` and everything below it.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(Node::Text(text)) = self.node(id) {
            return text.clone();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(Node::Text(text)) = self.node(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Whether `target` is reachable from `id` through child links.
    pub fn subtree_contains(&self, id: NodeId, target: NodeId) -> bool {
        id == target || self.descendants(id).any(|node| node == target)
    }
}

/// Cycle-safe pre-order traversal.
///
/// Each node is yielded once even when linked under several parents.
/// Call [`Descendants::skip_subtree`] to avoid descending into the node
/// that was just returned.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
    last: Option<NodeId>,
}

impl Descendants<'_> {
    pub fn skip_subtree(&mut self) {
        self.last = None;
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(last) = self.last.take() {
            self.stack
                .extend(self.doc.children(last).iter().rev().copied());
        }
        while let Some(id) = self.stack.pop() {
            if self.seen.insert(id) {
                self.last = Some(id);
                return Some(id);
            }
        }
        None
    }
}
