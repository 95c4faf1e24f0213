use paramtree_schema::{FieldType, Value};
use tracing::trace;

use super::{Forward, NodeId};
use crate::change::{Accepted, ChangeFn, EditMode};
use crate::error::TreeError;
use crate::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Dict,
}

/// A list or dictionary. Validates nothing; composes and forwards.
#[derive(Debug, Clone)]
pub struct ContainerNode {
    pub kind: ContainerKind,
    /// Declared element type when the container is a typed record field.
    pub element: Option<FieldType>,
    /// Element position each child displays.
    pub slots: Vec<usize>,
}

impl ContainerNode {
    pub fn new(kind: ContainerKind, element: Option<FieldType>) -> Self {
        Self {
            kind,
            element,
            slots: Vec::new(),
        }
    }
}

impl Forward for ContainerNode {
    fn field_value(&self, tree: &Tree, me: NodeId, child: NodeId) -> Result<Value, TreeError> {
        let pos = tree.slot_of(me, child)?;
        let element = match tree.field_value(me)? {
            Value::List(items) => items.into_iter().nth(pos),
            Value::Dict(map) => map.into_iter().nth(pos).map(|(_, v)| v),
            other => {
                return Err(TreeError::lookup(format!(
                    "container node holds a {}",
                    other.kind()
                )))
            }
        };
        element.ok_or_else(|| TreeError::lookup(format!("no element at position {pos}")))
    }

    fn forward(
        &self,
        tree: &Tree,
        me: NodeId,
        child: NodeId,
        change: ChangeFn<'_>,
        mode: EditMode,
    ) -> Result<Accepted, TreeError> {
        let pos = tree.slot_of(me, child)?;
        trace!(container = %me, position = pos, ?mode, "forwarding element change");
        tree.forward_from(me, change.at_position(pos), mode)
    }

    fn nearest_boundary(&self, tree: &Tree, me: NodeId) -> Option<NodeId> {
        tree.boundary_above(me)
    }
}
