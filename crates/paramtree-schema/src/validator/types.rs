use paramtree_path::{Path, PathStep};
use thiserror::Error;

use crate::constants::ErrorCode;
use crate::schema::RecordSchema;
use crate::value::Dict;

/// Options for [`crate::SchemaValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Coerce `Int` into float fields and integral `Float` into int fields.
    pub coerce: bool,
    /// Accept candidate keys that match no declared field (they are dropped).
    pub ignore_unknown: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            coerce: true,
            ignore_unknown: false,
        }
    }
}

/// A rejected candidate: where, which rule, and a readable message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} at `{path}`: {message}", .code.name())]
pub struct ValidationError {
    pub code: ErrorCode,
    /// Path relative to the validated record, e.g. `keycodes[1]`.
    pub path: Path,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ErrorCode, path: Path) -> Self {
        Self {
            code,
            path,
            message: code.message().to_string(),
        }
    }

    pub fn with_message(code: ErrorCode, path: Path, message: impl Into<String>) -> Self {
        Self {
            code,
            path,
            message: message.into(),
        }
    }

    /// Name of the top-level field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self.path.steps().first() {
            Some(PathStep::Field(name)) => Some(name),
            _ => None,
        }
    }
}

/// The validation authority consulted by boundary nodes.
///
/// Receives the candidate values of every field of one record and either
/// accepts them (returning the possibly coerced values, in declaration
/// order) or rejects the whole candidate.
pub trait Validator {
    fn validate(&self, schema: &RecordSchema, candidate: Dict) -> Result<Dict, ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&RecordSchema, Dict) -> Result<Dict, ValidationError>,
{
    fn validate(&self, schema: &RecordSchema, candidate: Dict) -> Result<Dict, ValidationError> {
        self(schema, candidate)
    }
}
