//! Conversions between [`Value`] and `serde_json::Value`.

use serde_json::{Map, Number, Value as Json};

use super::Value;

/// Render a value as JSON. Records become objects keyed by field name, in
/// declaration order. Non-finite floats become `null`.
pub(super) fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Str(s) => Json::String(s.clone()),
        Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Dict(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), to_json(v));
            }
            Json::Object(out)
        }
        Value::Record(record) => {
            let record = record.borrow();
            let mut out = Map::new();
            for (k, v) in record.fields() {
                out.insert(k.clone(), to_json(v));
            }
            Json::Object(out)
        }
    }
}

fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::Str(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(from_json).collect()),
        Json::Object(map) => Value::Dict(
            map.iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect(),
        ),
    }
}

impl Value {
    /// Serialized form of the value, used for display and for comparing the
    /// state of a live object graph before and after an edit.
    pub fn to_json(&self) -> Json {
        to_json(self)
    }

    /// Convert a JSON document into schemaless values: objects become
    /// dictionaries, integral numbers become `Int`.
    pub fn from_json(json: &Json) -> Value {
        from_json(json)
    }
}
