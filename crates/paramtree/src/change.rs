//! Change functions: pending edits threaded from a leaf up to the record
//! that validates them.
//!
//! A change function receives an owned, detached copy of the value it edits
//! (lists and dictionaries copied, records shared) and returns the new value.
//! Containers wrap the change of one of their children into a change of
//! their own value, so by the time a boundary node applies it, the function
//! edits exactly one record field. Because every function works on its own
//! copy, a dry run can never reach a live collection at any depth.

use std::fmt;

use paramtree_schema::Value;

use crate::error::TreeError;
use crate::node::NodeId;

/// Whether an edit only validates or also writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Dry run: validate, never mutate.
    Propose,
    /// Validate, then write the accepted value.
    Commit,
}

/// Outcome of an accepted edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    /// Boundary node that validated the edit, `None` for a schemaless root.
    pub boundary: Option<NodeId>,
    /// Record field the edit landed in.
    pub field: Option<String>,
    /// Accepted value of that field (or of the whole root), after coercion.
    pub value: Value,
}

type Transform<'a> = Box<dyn FnOnce(Value) -> Result<Value, TreeError> + 'a>;

pub struct ChangeFn<'a>(Transform<'a>);

impl fmt::Debug for ChangeFn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeFn")
    }
}

impl<'a> ChangeFn<'a> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Value) -> Result<Value, TreeError> + 'a,
    {
        ChangeFn(Box::new(f))
    }

    /// `x -> value`, the change a leaf issues for its own new value.
    pub fn set(value: Value) -> Self {
        ChangeFn::new(move |_| Ok(value))
    }

    pub fn apply(self, current: Value) -> Result<Value, TreeError> {
        (self.0)(current)
    }

    /// Lift a change of the element at `pos` into a change of the whole list
    /// or dictionary.
    ///
    /// The position is resolved against the value the composed function
    /// receives, so it always addresses the element currently there.
    pub fn at_position(self, pos: usize) -> ChangeFn<'a> {
        ChangeFn::new(move |mut outer| {
            let slot = match &mut outer {
                Value::List(items) => items.get_mut(pos),
                Value::Dict(map) => map.get_index_mut(pos).map(|(_, v)| v),
                other => {
                    return Err(TreeError::lookup(format!(
                        "expected a list or dictionary, found {}",
                        other.kind()
                    )))
                }
            };
            let slot = slot.ok_or_else(|| TreeError::lookup(format!("no element at position {pos}")))?;
            let current = std::mem::replace(slot, Value::Null);
            *slot = self.apply(current)?;
            Ok(outer)
        })
    }

    /// Insert `value` into a list at `index`.
    pub fn insert_at(index: usize, value: Value) -> ChangeFn<'a> {
        ChangeFn::new(move |mut outer| {
            let items = outer
                .as_list_mut()
                .ok_or_else(|| TreeError::lookup("insert by index into a non-list"))?;
            if index > items.len() {
                return Err(TreeError::lookup(format!(
                    "insert position {index} past end of list of {}",
                    items.len()
                )));
            }
            items.insert(index, value);
            Ok(outer)
        })
    }

    /// Append a new `key` to a dictionary.
    pub fn insert_key(key: String, value: Value) -> ChangeFn<'a> {
        ChangeFn::new(move |mut outer| {
            let map = outer
                .as_dict_mut()
                .ok_or_else(|| TreeError::lookup("insert by key into a non-dictionary"))?;
            if map.contains_key(&key) {
                return Err(TreeError::KeyExists(key));
            }
            map.insert(key, value);
            Ok(outer)
        })
    }

    /// Remove the element at `pos`, keeping the order of the rest.
    pub fn remove_at(pos: usize) -> ChangeFn<'a> {
        ChangeFn::new(move |mut outer| {
            let removed = match &mut outer {
                Value::List(items) if pos < items.len() => Some(items.remove(pos)),
                Value::Dict(map) => map.shift_remove_index(pos).map(|(_, v)| v),
                _ => None,
            };
            match removed {
                Some(_) => Ok(outer),
                None => Err(TreeError::lookup(format!("no element at position {pos}"))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_position_list() {
        let change = ChangeFn::set(Value::Float(9.9)).at_position(1);
        let out = change.apply(Value::list([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(out, Value::list([1.0, 9.9, 3.0]));
    }

    #[test]
    fn test_at_position_dict() {
        let change = ChangeFn::set(Value::Float(4.0)).at_position(0);
        let out = change.apply(Value::dict([("seats", 1.0)])).unwrap();
        assert_eq!(out, Value::dict([("seats", 4.0)]));
    }

    #[test]
    fn test_nested_composition() {
        let change = ChangeFn::set(Value::Int(0)).at_position(1).at_position(0);
        let value = Value::List(vec![Value::list([1, 2]), Value::list([3])]);
        let out = change.apply(value).unwrap();
        assert_eq!(out, Value::List(vec![Value::list([1, 0]), Value::list([3])]));
    }

    #[test]
    fn test_position_out_of_range() {
        let err = ChangeFn::set(Value::Null)
            .at_position(5)
            .apply(Value::list([1.0]))
            .unwrap_err();
        assert!(matches!(err, TreeError::StructuralLookup(_)));
    }

    #[test]
    fn test_structural_changes() {
        let out = ChangeFn::insert_at(1, Value::Float(1.5))
            .apply(Value::list([1.0, 2.0]))
            .unwrap();
        assert_eq!(out, Value::list([1.0, 1.5, 2.0]));

        let out = ChangeFn::remove_at(0).apply(out).unwrap();
        assert_eq!(out, Value::list([1.5, 2.0]));

        let err = ChangeFn::insert_key("seats".into(), Value::Float(2.0))
            .apply(Value::dict([("seats", 1.0)]))
            .unwrap_err();
        assert_eq!(err, TreeError::KeyExists("seats".into()));
    }
}
