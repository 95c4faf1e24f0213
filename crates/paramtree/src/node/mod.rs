//! Node hierarchy.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. Every node except the root has exactly one parent. A node
//! never stores the value it displays as the source of truth: the value is
//! always read through its parent, which resolves the child's current
//! position among its siblings at call time.

mod boundary;
mod container;
mod leaf;

use std::fmt;

use paramtree_schema::Value;

pub use boundary::BoundaryNode;
pub use container::{ContainerKind, ContainerNode};
pub use leaf::LeafNode;

use crate::change::{Accepted, ChangeFn, EditMode};
use crate::error::TreeError;
use crate::tree::Tree;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Display name: field alias or name, `name[i]` for list elements,
    /// `name[key]` for dictionary entries.
    pub name: String,
    pub description: Option<String>,
    /// Type hint for display, e.g. `Model[Car]`, `<list>`, `Field[float]`.
    pub typehint: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_boundary(&self) -> Option<&BoundaryNode> {
        match &self.kind {
            NodeKind::Boundary(boundary) => Some(boundary),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerNode> {
        match &self.kind {
            NodeKind::Container(container) => Some(container),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Owns one live record; sole validation authority for its fields.
    Boundary(BoundaryNode),
    /// A list or dictionary; forwards composed edits to its parent.
    Container(ContainerNode),
    /// A primitive; originates edits.
    Leaf(LeafNode),
}

impl NodeKind {
    /// Child position to value position. Children of unsupported values that
    /// were skipped during the build have no node, so the two can differ.
    pub fn slots(&self) -> &[usize] {
        match self {
            NodeKind::Boundary(b) => &b.slots,
            NodeKind::Container(c) => &c.slots,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub(crate) fn slots_mut(&mut self) -> Option<&mut Vec<usize>> {
        match self {
            NodeKind::Boundary(b) => Some(&mut b.slots),
            NodeKind::Container(c) => Some(&mut c.slots),
            NodeKind::Leaf(_) => None,
        }
    }
}

/// The upward half of the change protocol, implemented by every node
/// variant.
///
/// `me` is the id of the node the method is called on and `child` one of its
/// children. Implementations resolve `child` by its current position among
/// `me`'s children, never by a cached name or index.
pub trait Forward {
    /// Live value of the slot `child` occupies.
    fn field_value(&self, tree: &Tree, me: NodeId, child: NodeId) -> Result<Value, TreeError>;

    /// Route `change`, expressed against `child`'s value, towards the
    /// validation authority.
    fn forward(
        &self,
        tree: &Tree,
        me: NodeId,
        child: NodeId,
        change: ChangeFn<'_>,
        mode: EditMode,
    ) -> Result<Accepted, TreeError>;

    /// The closest boundary node at or above `me`.
    fn nearest_boundary(&self, tree: &Tree, me: NodeId) -> Option<NodeId>;

    /// Dry run: validate as if `change` were applied. Never mutates.
    fn propose_change(
        &self,
        tree: &Tree,
        me: NodeId,
        child: NodeId,
        change: ChangeFn<'_>,
    ) -> Result<Accepted, TreeError> {
        self.forward(tree, me, child, change, EditMode::Propose)
    }

    /// Validate, then write the accepted value into the live record.
    fn apply_change(
        &self,
        tree: &Tree,
        me: NodeId,
        child: NodeId,
        change: ChangeFn<'_>,
    ) -> Result<Accepted, TreeError> {
        self.forward(tree, me, child, change, EditMode::Commit)
    }
}

impl Forward for NodeKind {
    fn field_value(&self, tree: &Tree, me: NodeId, child: NodeId) -> Result<Value, TreeError> {
        match self {
            NodeKind::Boundary(b) => b.field_value(tree, me, child),
            NodeKind::Container(c) => c.field_value(tree, me, child),
            NodeKind::Leaf(l) => l.field_value(tree, me, child),
        }
    }

    fn forward(
        &self,
        tree: &Tree,
        me: NodeId,
        child: NodeId,
        change: ChangeFn<'_>,
        mode: EditMode,
    ) -> Result<Accepted, TreeError> {
        match self {
            NodeKind::Boundary(b) => b.forward(tree, me, child, change, mode),
            NodeKind::Container(c) => c.forward(tree, me, child, change, mode),
            NodeKind::Leaf(l) => l.forward(tree, me, child, change, mode),
        }
    }

    fn nearest_boundary(&self, tree: &Tree, me: NodeId) -> Option<NodeId> {
        match self {
            NodeKind::Boundary(b) => b.nearest_boundary(tree, me),
            NodeKind::Container(c) => c.nearest_boundary(tree, me),
            NodeKind::Leaf(l) => l.nearest_boundary(tree, me),
        }
    }
}
