use paramtree_schema::Value;

use super::{Forward, NodeId};
use crate::binding::RawInput;
use crate::change::{Accepted, ChangeFn, EditMode};
use crate::error::TreeError;
use crate::registry::{LeafHandler, LeafKind};
use crate::tree::Tree;

/// A primitive value: where edits originate.
#[derive(Debug, Clone)]
pub struct LeafNode {
    pub handler: LeafHandler,
    /// Last committed value, as displayed.
    pub value: Value,
}

impl LeafNode {
    pub fn new(handler: LeafHandler, value: Value) -> Self {
        Self { handler, value }
    }

    pub fn kind(&self) -> LeafKind {
        self.handler.kind
    }

    /// Parse raw control input into this leaf's type.
    pub fn interpret(&self, raw: &RawInput) -> Result<Value, TreeError> {
        self.handler.interpret(raw)
    }
}

impl Forward for LeafNode {
    fn field_value(&self, tree: &Tree, me: NodeId, _child: NodeId) -> Result<Value, TreeError> {
        Err(TreeError::NotAContainer(tree.node(me)?.name.clone()))
    }

    fn forward(
        &self,
        tree: &Tree,
        me: NodeId,
        _child: NodeId,
        _change: ChangeFn<'_>,
        _mode: EditMode,
    ) -> Result<Accepted, TreeError> {
        Err(TreeError::NotAContainer(tree.node(me)?.name.clone()))
    }

    fn nearest_boundary(&self, tree: &Tree, me: NodeId) -> Option<NodeId> {
        tree.boundary_above(me)
    }
}
