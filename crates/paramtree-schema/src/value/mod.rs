//! The editable value model.
//!
//! A [`Value`] is a tree of primitives, lists, dictionaries and records.
//! Records carry their schema and are shared by handle ([`RecordRef`]): the
//! same record instance is reachable from its parent's field and from the
//! tree node that owns it, so a write through one is visible through the
//! other.
//!
//! `Clone` on a `Value` copies every list and dictionary but shares record
//! handles. That is the copy the change protocol works on: collections are
//! private to the copy, records stay identical. Use [`Value::deep_copy`] for a
//! fully independent snapshot.

mod clone;
mod json;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::schema::SchemaRef;

/// Shared handle to a live record instance.
pub type RecordRef = Rc<RefCell<Record>>;

/// Ordered string-keyed map used for dictionaries and record fields.
pub type Dict = IndexMap<String, Value>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dict(Dict),
    Record(RecordRef),
}

/// Shape of a value, used by dispatch tables and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Dict,
    Record,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Record => "record",
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float | Self::Str)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Wrap a record into a shared handle.
    pub fn record(record: Record) -> Self {
        Value::Record(Rc::new(RefCell::new(record)))
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Dict(_) => ValueKind::Dict,
            Value::Record(_) => ValueKind::Record,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Short human-readable rendering used for display controls.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Str(s) => s.clone(),
            other => self::json::to_json(other).to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::record(v)
    }
}

impl From<RecordRef> for Value {
    fn from(v: RecordRef) -> Self {
        Value::Record(v)
    }
}

/// A live record instance: a schema plus one value per declared field, in
/// declaration order.
#[derive(Debug, Clone)]
pub struct Record {
    schema: SchemaRef,
    fields: Dict,
}

impl Record {
    /// Assemble a record from already-validated field values.
    ///
    /// Use [`crate::instantiate`] to build one from defaults and overrides
    /// with validation.
    pub fn from_validated(schema: SchemaRef, fields: Dict) -> Self {
        Self { schema, fields }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field name and value at declaration position `pos`.
    pub fn get_index(&self, pos: usize) -> Option<(&String, &Value)> {
        self.fields.get_index(pos)
    }

    pub fn fields(&self) -> &Dict {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overwrite one existing field, returning the previous value.
    ///
    /// This performs no validation. Callers are expected to have validated
    /// the full record with the new value substituted.
    pub fn assign(&mut self, name: &str, value: Value) -> Option<Value> {
        self.fields
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, value))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name && self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, RecordSchema};

    fn engine_schema() -> SchemaRef {
        RecordSchema::builder("Engine")
            .field("hp", FieldType::float(), Value::Float(100.0))
            .build()
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Float(1.0).kind().name(), "float");
        assert_eq!(Value::list([1.0, 2.0]).kind(), ValueKind::List);
        assert!(ValueKind::Str.is_primitive());
        assert!(!ValueKind::Null.is_primitive());
    }

    #[test]
    fn test_as_f64_widens_int() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Str("3".into()).as_f64(), None);
    }

    #[test]
    fn test_clone_shares_records() {
        let schema = engine_schema();
        let record = crate::instantiate(&schema, Vec::<(String, Value)>::new()).unwrap();
        let list = Value::List(vec![Value::Record(record.clone())]);
        let copy = list.clone();
        let original = list.as_list().unwrap()[0].as_record().unwrap();
        let copied = copy.as_list().unwrap()[0].as_record().unwrap();
        assert!(Rc::ptr_eq(original, copied));
    }

    #[test]
    fn test_assign_unknown_field_is_noop() {
        let schema = engine_schema();
        let record = crate::instantiate(&schema, Vec::<(String, Value)>::new()).unwrap();
        assert_eq!(record.borrow_mut().assign("torque", Value::Int(1)), None);
        assert_eq!(
            record.borrow_mut().assign("hp", Value::Float(250.0)),
            Some(Value::Float(100.0))
        );
        assert_eq!(record.borrow().get("hp"), Some(&Value::Float(250.0)));
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::Float(420.0).render(), "420.0");
        assert_eq!(Value::Bool(true).render(), "true");
        assert_eq!(Value::list([1.0, 2.5]).render(), "[1.0,2.5]");
    }
}
