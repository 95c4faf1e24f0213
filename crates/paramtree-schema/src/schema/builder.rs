//! Fluent construction of record schemas.

use std::rc::Rc;

use super::schema::{FieldDescriptor, FieldType, RecordSchema, SchemaRef};
use crate::value::{Dict, Value};

/// Builder for [`RecordSchema`].
///
/// # Example
///
/// ```
/// use paramtree_schema::{FieldDescriptor, FieldType, NumSchema, RecordSchema, Value};
///
/// let car = RecordSchema::builder("Car")
///     .descriptor(
///         FieldDescriptor::new("price", FieldType::Float(NumSchema::new().gt(0.0).lt(100000.0)))
///             .description("price in US dollars")
///             .default(3000.1),
///     )
///     .field("available", FieldType::bool(), Value::Bool(true))
///     .build();
/// assert_eq!(car.fields.len(), 2);
/// assert_eq!(car.position("available"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    schema: RecordSchema,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: RecordSchema {
                name: name.into(),
                description: None,
                extends: None,
                fields: Vec::new(),
                validators: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    /// Inherit every field and record check of `parent`.
    ///
    /// Fields declared afterwards with the same name replace the inherited
    /// ones in place, so declaration order follows the parent.
    pub fn extends(mut self, parent: &SchemaRef) -> Self {
        self.schema.fields = parent.fields.clone();
        self.schema.validators = parent.validators.clone();
        self.schema.extends = Some(parent.clone());
        self
    }

    /// Declare a field with an optional default.
    pub fn field(
        self,
        name: impl Into<String>,
        type_: FieldType,
        default: impl Into<Option<Value>>,
    ) -> Self {
        let mut descriptor = FieldDescriptor::new(name, type_);
        descriptor.default = default.into();
        self.descriptor(descriptor)
    }

    /// Declare a fully described field.
    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        match self
            .schema
            .fields
            .iter_mut()
            .find(|f| f.name == descriptor.name)
        {
            Some(slot) => *slot = descriptor,
            None => self.schema.fields.push(descriptor),
        }
        self
    }

    /// Replace the default of an already declared (or inherited) field.
    /// Unknown names are ignored.
    pub fn default(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(field) = self.schema.fields.iter_mut().find(|f| f.name == name) {
            field.default = Some(value.into());
        }
        self
    }

    /// Attach a record-level check that sees every candidate field value.
    pub fn validator<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Dict) -> Option<String> + 'static,
    {
        self.schema
            .validators
            .push((Rc::new(check), Some(name.into())));
        self
    }

    pub fn build(self) -> SchemaRef {
        Rc::new(self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra() -> SchemaRef {
        RecordSchema::builder("Extra")
            .field("name", FieldType::str(), None)
            .build()
    }

    #[test]
    fn test_extends_inherits_fields() {
        let parent = extra();
        let ac = RecordSchema::builder("AC")
            .extends(&parent)
            .default("name", "air conditioner")
            .build();
        assert_eq!(ac.fields.len(), 1);
        assert_eq!(
            ac.field("name").unwrap().default,
            Some(Value::from("air conditioner"))
        );
        assert!(ac.is_a(&parent));
        assert!(!parent.is_a(&ac));
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let schema = RecordSchema::builder("Engine")
            .field("hp", FieldType::float(), Value::Float(100.0))
            .field("cylinders", FieldType::int(), Value::Int(4))
            .field("hp", FieldType::int(), Value::Int(90))
            .build();
        assert_eq!(schema.position("hp"), Some(0));
        assert_eq!(schema.fields.len(), 2);
    }
}
