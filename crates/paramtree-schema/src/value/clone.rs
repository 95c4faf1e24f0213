use std::cell::RefCell;
use std::rc::Rc;

use super::{Record, Value};

impl Value {
    /// Creates a fully independent copy of the value.
    ///
    /// Unlike `clone`, every nested record is duplicated into a new handle,
    /// so writes through the copy are never visible through the original.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::List(items) => Value::List(items.iter().map(Value::deep_copy).collect()),
            Value::Dict(map) => Value::Dict(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy()))
                    .collect(),
            ),
            Value::Record(record) => {
                let record = record.borrow();
                let fields = record
                    .fields()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy()))
                    .collect();
                Value::Record(Rc::new(RefCell::new(Record::from_validated(
                    record.schema().clone(),
                    fields,
                ))))
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, RecordSchema};

    #[test]
    fn test_deep_copy_primitives() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Int(7),
            Value::Float(1.5),
            Value::Str("hello".into()),
        ] {
            assert_eq!(value.deep_copy(), value);
        }
    }

    #[test]
    fn test_deep_copy_nested_collections() {
        let value = Value::dict([
            ("volume", Value::list([400.0, 450.0])),
            ("height", Value::list([1.0, 1.2])),
        ]);
        assert_eq!(value.deep_copy(), value);
    }

    #[test]
    fn test_deep_copy_detaches_records() {
        let schema = RecordSchema::builder("Door")
            .field("side", FieldType::str(), Value::from("left"))
            .build();
        let door = crate::instantiate(&schema, Vec::<(String, Value)>::new()).unwrap();
        let original = Value::Record(door.clone());
        let copy = original.deep_copy();

        let copied = copy.as_record().unwrap();
        assert!(!Rc::ptr_eq(&door, copied));
        copied.borrow_mut().assign("side", Value::from("right"));

        assert_eq!(door.borrow().get("side"), Some(&Value::from("left")));
        assert_ne!(original, copy);
    }
}
