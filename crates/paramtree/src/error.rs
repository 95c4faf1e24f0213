use paramtree_path::PathError;
use paramtree_schema::{ValidationError, ValueKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// A value matched no registry entry while building.
    #[error("unsupported value of kind `{kind}` at `{path}`")]
    UnsupportedType { path: String, kind: ValueKind },
    /// Raw input could not be turned into the leaf's declared type.
    #[error("cannot interpret {raw:?} as {expected}")]
    Interpretation { expected: String, raw: String },
    /// The owning record rejected the candidate. The live record is unchanged.
    #[error("`{record}` rejected the edit: {source}")]
    Validation {
        record: String,
        #[source]
        source: ValidationError,
    },
    /// The node tree and the live object graph diverged.
    #[error("structural lookup failed: {0}")]
    StructuralLookup(String),
    #[error("no node at `{0}`")]
    NodeNotFound(String),
    #[error("`{0}` is not a leaf")]
    NotALeaf(String),
    #[error("`{0}` is not a list or dictionary")]
    NotAContainer(String),
    #[error("key `{0}` already exists")]
    KeyExists(String),
    #[error(transparent)]
    Path(#[from] PathError),
}

impl TreeError {
    /// The validator's verdict, when this is a rejected edit.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            TreeError::Validation { source, .. } => Some(source),
            _ => None,
        }
    }

    pub(crate) fn lookup(what: impl Into<String>) -> Self {
        TreeError::StructuralLookup(what.into())
    }
}
