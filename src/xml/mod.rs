//! Arena-based document tree for book XML.
//!
//! The corpus files are small enough to parse eagerly into an arena: all
//! nodes live in a contiguous vector and parent/child/sibling links are
//! indices into it. The normalizer mutates this tree (removing headings,
//! replacing superscripts with plain text) before the extractor flattens
//! each chapter to a string.

mod parser;

pub use parser::parse_document;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with tag name and attributes.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        /// Pre-extracted classes for fast matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based XML document.
///
/// Detached nodes remain allocated but unreachable; traversal always starts
/// from the document root, so they never reappear in query results.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create a new empty document with a root node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId::NONE,
        };
        doc.root = doc.alloc(NodeData::Document);
        doc
    }

    /// Allocate a new node in the arena.
    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Get the document root ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Append `child` as the last child of `parent`.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last = self.node(parent).last_child;
        {
            let node = self.node_mut(child);
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }
        if prev_last.is_some() {
            self.node_mut(prev_last).next_sibling = child;
        } else {
            self.node_mut(parent).first_child = child;
        }
        self.node_mut(parent).last_child = child;
    }

    /// Tag name of an element node, or `None` for text/root nodes.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether the element carries the given class.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        match &self.node(id).data {
            NodeData::Element { classes, .. } => classes.iter().any(|c| c == class),
            _ => false,
        }
    }

    /// All elements with the given tag name, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        self.find_all_in(self.root, tag, None)
    }

    /// All elements with the given tag name and class, in document order.
    pub fn find_all_with_class(&self, tag: &str, class: &str) -> Vec<NodeId> {
        self.find_all_in(self.root, tag, Some(class))
    }

    /// All matching elements within the subtree rooted at `scope`
    /// (excluding `scope` itself), in document order.
    pub fn find_all_in(&self, scope: NodeId, tag: &str, class: Option<&str>) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(scope, &mut |doc, id| {
            if id != scope
                && doc.tag_name(id) == Some(tag)
                && class.is_none_or(|c| doc.has_class(id, c))
            {
                out.push(id);
            }
        });
        out
    }

    /// Depth-first pre-order walk of the subtree rooted at `id`.
    fn walk(&self, id: NodeId, visit: &mut dyn FnMut(&Self, NodeId)) {
        visit(self, id);
        let mut child = self.node(id).first_child;
        while child.is_some() {
            self.walk(child, visit);
            child = self.node(child).next_sibling;
        }
    }

    /// Concatenated text of all text descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.walk(id, &mut |doc, id| {
            if let NodeData::Text(text) = &doc.node(id).data {
                out.push_str(text);
            }
        });
        out
    }

    /// Detach a node (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = self.node(id);
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if parent.is_none() {
            return;
        }
        if prev.is_some() {
            self.node_mut(prev).next_sibling = next;
        } else {
            self.node_mut(parent).first_child = next;
        }
        if next.is_some() {
            self.node_mut(next).prev_sibling = prev;
        } else {
            self.node_mut(parent).last_child = prev;
        }
        let node = self.node_mut(id);
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Replace a node in place with a text node carrying `text`.
    /// Any children of the node are dropped from the tree.
    pub fn replace_with_text(&mut self, id: NodeId, text: impl Into<String>) {
        let node = self.node_mut(id);
        node.data = NodeData::Text(text.into());
        node.first_child = NodeId::NONE;
        node.last_child = NodeId::NONE;
    }

    /// Nearest preceding sibling that is an element, skipping text nodes.
    pub fn prev_sibling_element(&self, id: NodeId) -> NodeId {
        let mut cur = self.node(id).prev_sibling;
        while cur.is_some() {
            if matches!(self.node(cur).data, NodeData::Element { .. }) {
                return cur;
            }
            cur = self.node(cur).prev_sibling;
        }
        NodeId::NONE
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
