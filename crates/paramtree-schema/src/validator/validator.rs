//! Runtime record validator.
//!
//! Checks every field of a candidate record against its declared type and
//! constraints, then runs the field and record validators. The first failure
//! rejects the whole candidate.

use paramtree_path::{Path, PathStep};

use crate::constants::ErrorCode;
use crate::schema::{FieldType, NumSchema, RecordSchema, StrSchema};
use crate::value::{Dict, Value};

use super::types::{ValidationError, Validator, ValidatorOptions};

/// Validator driven by [`RecordSchema`] declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    pub options: ValidatorOptions,
}

impl SchemaValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, schema: &RecordSchema, candidate: Dict) -> Result<Dict, ValidationError> {
        validate_record(schema, candidate, &self.options)
    }
}

/// Validate a full candidate field map against `schema`.
///
/// Missing fields take their declared default. Keys may be given by field
/// name or alias; the result is keyed by field name in declaration order.
pub fn validate_record(
    schema: &RecordSchema,
    mut candidate: Dict,
    opts: &ValidatorOptions,
) -> Result<Dict, ValidationError> {
    let mut accepted = Dict::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let path = Path::root().join(PathStep::Field(field.name.clone()));
        let raw = candidate
            .shift_remove(&field.name)
            .or_else(|| {
                field
                    .alias
                    .as_ref()
                    .and_then(|alias| candidate.shift_remove(alias))
            })
            .or_else(|| field.default.as_ref().map(Value::deep_copy));
        let raw = match raw {
            Some(v) => v,
            None => return Err(ValidationError::new(ErrorCode::Missing, path)),
        };

        let value = validate_value(raw, &field.type_, opts, &path)?;
        for (check, name) in &field.validators {
            if let Some(message) = check(&value) {
                return Err(custom_error(name.as_deref(), message, path));
            }
        }
        accepted.insert(field.name.clone(), value);
    }

    if !opts.ignore_unknown {
        if let Some(key) = candidate.keys().next() {
            let path = Path::root().join(PathStep::Field(key.clone()));
            return Err(ValidationError::new(ErrorCode::Key, path));
        }
    }

    for (check, name) in &schema.validators {
        if let Some(message) = check(&accepted) {
            return Err(custom_error(name.as_deref(), message, Path::root()));
        }
    }

    Ok(accepted)
}

fn custom_error(name: Option<&str>, message: String, path: Path) -> ValidationError {
    let message = match name {
        Some(name) => format!("{name}: {message}"),
        None => message,
    };
    ValidationError::with_message(ErrorCode::Validation, path, message)
}

/// Validate one value against a declared type, returning the accepted
/// (possibly coerced) value.
pub fn validate_value(
    value: Value,
    type_: &FieldType,
    opts: &ValidatorOptions,
    path: &Path,
) -> Result<Value, ValidationError> {
    match type_ {
        FieldType::Any => Ok(value),

        FieldType::Bool => match value {
            Value::Bool(_) => Ok(value),
            _ => Err(ValidationError::new(ErrorCode::Bool, path.clone())),
        },

        FieldType::Int(bounds) => {
            let value = match value {
                Value::Int(_) => value,
                Value::Float(f) if opts.coerce && f.is_finite() && f.fract() == 0.0 => {
                    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
                        return Err(ValidationError::new(ErrorCode::Int, path.clone()));
                    }
                    Value::Int(f as i64)
                }
                _ => return Err(ValidationError::new(ErrorCode::Int, path.clone())),
            };
            check_bounds(&value, bounds, path)?;
            Ok(value)
        }

        FieldType::Float(bounds) => {
            let value = match value {
                Value::Float(f) if f.is_finite() => value,
                Value::Int(i) if opts.coerce => Value::Float(i as f64),
                _ => return Err(ValidationError::new(ErrorCode::Num, path.clone())),
            };
            check_bounds(&value, bounds, path)?;
            Ok(value)
        }

        FieldType::Str(schema) => validate_str(value, schema, path),

        FieldType::List { item, min, max } => {
            let items = match value {
                Value::List(items) => items,
                _ => return Err(ValidationError::new(ErrorCode::Arr, path.clone())),
            };
            let len = items.len() as u64;
            if min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max) {
                return Err(ValidationError::new(ErrorCode::ArrLen, path.clone()));
            }
            let mut out = Vec::with_capacity(items.len());
            for (i, element) in items.into_iter().enumerate() {
                let p = path.join(PathStep::Index(i));
                out.push(validate_value(element, item, opts, &p)?);
            }
            Ok(Value::List(out))
        }

        FieldType::Dict { value: value_type } => {
            let map = match value {
                Value::Dict(map) => map,
                _ => return Err(ValidationError::new(ErrorCode::Map, path.clone())),
            };
            let mut out = Dict::with_capacity(map.len());
            for (key, element) in map {
                let p = path.join(PathStep::Key(key.clone()));
                let element = validate_value(element, value_type, opts, &p)?;
                out.insert(key, element);
            }
            Ok(Value::Dict(out))
        }

        FieldType::Record(expected) => {
            let matches = match &value {
                Value::Record(record) => record.borrow().schema().is_a(expected),
                _ => false,
            };
            if !matches {
                let message = format!("expected a `{}` record", expected.name);
                return Err(ValidationError::with_message(
                    ErrorCode::Record,
                    path.clone(),
                    message,
                ));
            }
            Ok(value)
        }

        FieldType::Optional(inner) => match value {
            Value::Null => Ok(value),
            other => validate_value(other, inner, opts, path),
        },
    }
}

fn check_bounds(value: &Value, bounds: &NumSchema, path: &Path) -> Result<(), ValidationError> {
    let num = match value.as_f64() {
        Some(n) => n,
        None => return Err(ValidationError::new(ErrorCode::Num, path.clone())),
    };
    let fail = |code: ErrorCode, limit: f64| {
        Err(ValidationError::with_message(
            code,
            path.clone(),
            format!("{} ({} violates limit {})", code.message(), num, limit),
        ))
    };
    if let Some(gt) = bounds.gt {
        if num <= gt {
            return fail(ErrorCode::Gt, gt);
        }
    }
    if let Some(gte) = bounds.gte {
        if num < gte {
            return fail(ErrorCode::Gte, gte);
        }
    }
    if let Some(lt) = bounds.lt {
        if num >= lt {
            return fail(ErrorCode::Lt, lt);
        }
    }
    if let Some(lte) = bounds.lte {
        if num > lte {
            return fail(ErrorCode::Lte, lte);
        }
    }
    Ok(())
}

fn validate_str(value: Value, schema: &StrSchema, path: &Path) -> Result<Value, ValidationError> {
    let len = match &value {
        Value::Str(s) => s.chars().count() as u64,
        _ => return Err(ValidationError::new(ErrorCode::Str, path.clone())),
    };
    if let Some(min) = schema.min {
        if len < min {
            return Err(ValidationError::new(ErrorCode::StrLen, path.clone()));
        }
    }
    if let Some(max) = schema.max {
        if len > max {
            return Err(ValidationError::new(ErrorCode::StrLen, path.clone()));
        }
    }
    Ok(value)
}
