use paramtree_path::Path;
use paramtree_schema::{ValidationError, Value};

use super::RawInput;
use crate::node::NodeId;

/// Notification emitted to binding listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// An edit was written into the live object.
    ValueCommitted {
        node: NodeId,
        path: Path,
        value: Value,
    },
    /// The owning record rejected an edit. The live object is unchanged.
    ValidationRejected {
        node: NodeId,
        path: Path,
        error: ValidationError,
    },
    /// Raw input could not be interpreted; nothing was proposed.
    InputRejected {
        node: NodeId,
        raw: RawInput,
        message: String,
    },
}

impl TreeEvent {
    pub fn node(&self) -> NodeId {
        match self {
            TreeEvent::ValueCommitted { node, .. }
            | TreeEvent::ValidationRejected { node, .. }
            | TreeEvent::InputRejected { node, .. } => *node,
        }
    }
}
