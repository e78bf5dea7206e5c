use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// NodeId

/// Index of a [`Node`] inside the [`Tree`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    const fn new(index: usize) -> Self {
        if index > u32::MAX as usize {
            panic!("too many tree nodes");
        }
        Self(index as u32)
    }

    /// The position of the node in its tree.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// -----------------------------------------------------------------------------
// SourceLocation

/// A 1-based position in the source text a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// -----------------------------------------------------------------------------
// Node

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Number(f64),
    Bool(bool),
}

/// The value held by a [`Node`].
///
/// Object member names are not required to be unique. Lookups return the
/// first member with a matching name.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    Sequence(Vec<NodeId>),
    Object(Vec<(String, NodeId)>),
}

impl NodeValue {
    /// A short name of the value shape, used in diagnostics.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(Scalar::Str(_)) => "string",
            Self::Scalar(Scalar::Number(_)) => "number",
            Self::Scalar(Scalar::Bool(_)) => "boolean",
            Self::Sequence(_) => "sequence",
            Self::Object(_) => "object",
        }
    }
}

/// A tree node: a value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    value: NodeValue,
    location: Option<SourceLocation>,
}

impl Node {
    #[inline]
    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    /// The source position, `None` for nodes built in memory.
    #[inline]
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }
}

// -----------------------------------------------------------------------------
// Tree

/// An arena of [`Node`]s addressed by [`NodeId`].
///
/// Trees are append-only: nodes are never removed, and a [`NodeId`] stays
/// valid for the lifetime of its tree. Passing an id to a tree that did not
/// create it yields unrelated nodes or `None`.
///
/// # Examples
///
/// ```
/// use rt_reflect::tree::Tree;
///
/// let mut tree = Tree::new();
/// let x = tree.number(1.0);
/// let name = tree.string("origin");
/// let root = tree.object(vec![("x".into(), x), ("name".into(), name)]);
///
/// let found = tree.member(root, "name").unwrap();
/// assert_eq!(tree.as_str(found), Some("origin"));
/// assert_eq!(tree.as_number(tree.member(root, "x").unwrap()), Some(1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    file: Option<String>,
}

impl Tree {
    /// Creates an empty tree.
    #[inline]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            file: None,
        }
    }

    /// Creates an empty tree whose nodes come from `file`.
    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            file: Some(file.into()),
        }
    }

    /// The source file name, if any.
    #[inline]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn set_file(&mut self, file: Option<String>) {
        self.file = file;
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every node, invalidating all ids.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Appends a node without location.
    #[inline]
    pub fn push(&mut self, value: NodeValue) -> NodeId {
        self.push_located(value, None)
    }

    /// Appends a node.
    pub fn push_located(&mut self, value: NodeValue, location: Option<SourceLocation>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { value, location });
        id
    }

    #[inline]
    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeValue::Scalar(Scalar::Str(value.into())))
    }

    #[inline]
    pub fn number(&mut self, value: f64) -> NodeId {
        self.push(NodeValue::Scalar(Scalar::Number(value)))
    }

    #[inline]
    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.push(NodeValue::Scalar(Scalar::Bool(value)))
    }

    #[inline]
    pub fn sequence(&mut self, items: Vec<NodeId>) -> NodeId {
        self.push(NodeValue::Sequence(items))
    }

    #[inline]
    pub fn object(&mut self, members: Vec<(String, NodeId)>) -> NodeId {
        self.push(NodeValue::Object(members))
    }

    /// Appends `item` to the sequence `sequence`.
    ///
    /// Returns `false` if `sequence` is not a sequence node.
    pub fn append(&mut self, sequence: NodeId, item: NodeId) -> bool {
        match self.nodes.get_mut(sequence.index()).map(|n| &mut n.value) {
            Some(NodeValue::Sequence(items)) => {
                items.push(item);
                true
            }
            _ => false,
        }
    }

    /// Appends the member `name = child` to the object `object`.
    ///
    /// Returns `false` if `object` is not an object node.
    pub fn insert(&mut self, object: NodeId, name: impl Into<String>, child: NodeId) -> bool {
        match self.nodes.get_mut(object.index()).map(|n| &mut n.value) {
            Some(NodeValue::Object(members)) => {
                members.push((name.into(), child));
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> Option<&NodeValue> {
        self.get(id).map(Node::value)
    }

    #[inline]
    pub fn location(&self, id: NodeId) -> Option<SourceLocation> {
        self.get(id).and_then(Node::location)
    }

    /// The members of an object node.
    pub fn members(&self, object: NodeId) -> Option<&[(String, NodeId)]> {
        match self.value(object)? {
            NodeValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// The items of a sequence node.
    pub fn items(&self, sequence: NodeId) -> Option<&[NodeId]> {
        match self.value(sequence)? {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The first member of `object` named `name`.
    pub fn member(&self, object: NodeId, name: &str) -> Option<NodeId> {
        self.members(object)?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, id)| *id)
    }

    pub fn as_str(&self, id: NodeId) -> Option<&str> {
        match self.value(id)? {
            NodeValue::Scalar(Scalar::Str(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self, id: NodeId) -> Option<f64> {
        match self.value(id)? {
            NodeValue::Scalar(Scalar::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self, id: NodeId) -> Option<bool> {
        match self.value(id)? {
            NodeValue::Scalar(Scalar::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
