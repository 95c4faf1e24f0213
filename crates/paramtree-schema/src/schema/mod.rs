//! Record schemas and field descriptors.

pub mod builder;
#[allow(clippy::module_inception)]
pub mod schema;

pub use builder::RecordBuilder;
pub use schema::{
    FieldDescriptor, FieldType, FieldValidatorFn, NumSchema, RecordSchema, RecordValidatorFn,
    SchemaRef, StrSchema, TypeTag,
};
