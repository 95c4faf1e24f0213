//! `paramtree-schema` — record schemas, the editable value model and the
//! runtime record validator.
//!
//! A [`RecordSchema`] declares named, typed fields with optional defaults,
//! bounds and custom checks. Live records ([`RecordRef`]) are created through
//! [`instantiate`], which fills defaults and validates, and are afterwards
//! mutated one field at a time by whoever owns them.

pub mod constants;
pub mod schema;
pub mod validator;
pub mod value;

pub use constants::ErrorCode;
pub use schema::{
    FieldDescriptor, FieldType, NumSchema, RecordBuilder, RecordSchema, SchemaRef, StrSchema,
    TypeTag,
};
pub use validator::{SchemaValidator, ValidationError, Validator, ValidatorOptions};
pub use value::{Dict, Record, RecordRef, Value, ValueKind};

use std::cell::RefCell;
use std::rc::Rc;

/// Create a live record from the schema's defaults plus `overrides`.
///
/// Overrides may name a field by name or alias. The full field map is
/// validated with the default [`SchemaValidator`].
///
/// # Example
///
/// ```
/// use paramtree_schema::{instantiate, FieldType, NumSchema, RecordSchema, Value};
///
/// let car = RecordSchema::builder("Car")
///     .field("price", FieldType::Float(NumSchema::new().gt(0.0)), Value::Float(3000.1))
///     .build();
/// let record = instantiate(&car, [("price", Value::Int(420))]).unwrap();
/// assert_eq!(record.borrow().get("price"), Some(&Value::Float(420.0)));
/// assert!(instantiate(&car, [("price", Value::Float(-1.0))]).is_err());
/// ```
///
/// # Errors
///
/// Returns the first [`ValidationError`] found in the assembled candidate.
pub fn instantiate<I, K>(schema: &SchemaRef, overrides: I) -> Result<RecordRef, ValidationError>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let candidate: Dict = overrides.into_iter().map(|(k, v)| (k.into(), v)).collect();
    let fields = SchemaValidator::default().validate(schema, candidate)?;
    Ok(Rc::new(RefCell::new(Record::from_validated(
        schema.clone(),
        fields,
    ))))
}
