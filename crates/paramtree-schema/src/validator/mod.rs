//! Record validation.

pub mod types;
#[allow(clippy::module_inception)]
pub mod validator;

pub use types::{ValidationError, Validator, ValidatorOptions};
pub use validator::{validate_record, validate_value, SchemaValidator};
