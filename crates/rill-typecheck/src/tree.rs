//! Read-only view of a Rill program tree.
//!
//! The editor owns the real tree, with positions, UI metadata and values. The
//! checker only needs each node's kind and its ordered children, so this
//! module models exactly that: an arena of nodes addressed by [`NodeId`]. The
//! ids are what the inference output and its errors refer back to.
//!
//! Nodes are built bottom-up, children first, and every node has at most one
//! parent, so the arena always holds a forest:
//!
//! ```
//! use rill_typecheck::{LiteralKind, Tree};
//!
//! let mut tree = Tree::new();
//! let label = tree.literal(LiteralKind::Text);
//! let root = tree.apply("show", vec![label]);
//!
//! assert_eq!(tree.node(root).children(), &[label]);
//! assert_eq!(tree.len(), 2);
//! ```

use crate::natives::Signature;
use crate::types::Ty;
use std::fmt;

/// Identity of a node within its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The id at arena position `index`, if it fits in an id.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Position of the node in its tree's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// Which base type a literal has. The literal's value is not needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// A number
    Number,
    /// A piece of text
    Text,
    /// `true` or `false`
    Boolean,
    /// The `nothing` value
    Nothing,
    /// A byte buffer
    Bytes,
}

impl LiteralKind {
    /// The literal's type.
    pub fn ty(self) -> Ty {
        match self {
            LiteralKind::Number => Ty::number(),
            LiteralKind::Text => Ty::text(),
            LiteralKind::Boolean => Ty::boolean(),
            LiteralKind::Nothing => Ty::nothing(),
            LiteralKind::Bytes => Ty::bytes(),
        }
    }
}

/// What a node does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A literal value. No children.
    Literal(LiteralKind),

    /// A use of a native or local binding. No children.
    Reference(String),

    /// A native or local binding applied to the children, in order.
    Apply(String),

    /// `let name = children[0] in children[1]`.
    Let(String),

    /// A function of one parameter; `children[0]` is the body.
    Lambda(String),

    /// A list of the children, which must share one element type.
    List,

    /// An unfilled slot in the editor.
    Hole,

    /// `children[0]`, required to have the given type.
    Ascribe(Signature),
}

/// A node: its kind, its children and the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    /// The node's kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's children, in evaluation order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node this one is a child of, `None` until it is used.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// An arena of nodes.
///
/// Every constructor takes the ids of already-built children, so the shape
/// of each node kind (two children for `Let`, one for `Lambda`, ...) is fixed
/// by the API.
///
/// # Panics
///
/// Every constructor panics if a child is not part of this tree, if a child
/// already has a parent (including the same id passed twice), or if the tree
/// already holds `u32::MAX + 1` nodes. Sharing a subtree would give one id
/// two types under different bindings, so a shared subtree must be built
/// twice.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// An empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node with the given id.
    ///
    /// # Panics
    ///
    /// If `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node with the given id, or `None` if it is not part of this tree.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Iterate over all nodes with their ids, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| NodeId::from_index(i).map(|id| (id, node)))
    }

    fn push(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let id = match NodeId::from_index(self.nodes.len()) {
            Some(id) => id,
            None => panic!("tree is full: {} nodes", self.nodes.len()),
        };

        for (pos, &child) in children.iter().enumerate() {
            match self.get(child) {
                None => panic!("{} is not part of this tree", child),
                Some(node) => {
                    if let Some(parent) = node.parent {
                        panic!("{} is already a child of {}", child, parent);
                    }
                }
            }
            if children[..pos].contains(&child) {
                panic!("{} is passed twice", child);
            }
        }
        for &child in &children {
            self.nodes[child.index()].parent = Some(id);
        }

        self.nodes.push(Node {
            kind,
            children,
            parent: None,
        });
        id
    }

    /// A literal.
    pub fn literal(&mut self, kind: LiteralKind) -> NodeId {
        self.push(NodeKind::Literal(kind), Vec::new())
    }

    /// A reference to `name`.
    pub fn reference(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Reference(name.into()), Vec::new())
    }

    /// `name(args...)`.
    pub fn apply(&mut self, name: impl Into<String>, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Apply(name.into()), args)
    }

    /// `let name = bound in body`.
    pub fn let_in(&mut self, name: impl Into<String>, bound: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::Let(name.into()), vec![bound, body])
    }

    /// `param => body`.
    pub fn lambda(&mut self, param: impl Into<String>, body: NodeId) -> NodeId {
        self.push(NodeKind::Lambda(param.into()), vec![body])
    }

    /// `[items...]`.
    pub fn list(&mut self, items: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::List, items)
    }

    /// An unfilled slot.
    pub fn hole(&mut self) -> NodeId {
        self.push(NodeKind::Hole, Vec::new())
    }

    /// `expr : signature`.
    pub fn ascribe(&mut self, expr: NodeId, signature: Signature) -> NodeId {
        self.push(NodeKind::Ascribe(signature), vec![expr])
    }
}
