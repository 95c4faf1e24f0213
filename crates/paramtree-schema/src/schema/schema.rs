use std::fmt;
use std::rc::Rc;

use crate::value::{Dict, Value};

/// Shared, immutable record schema.
pub type SchemaRef = Rc<RecordSchema>;

/// Custom field check: receives the candidate value, returns `Some(message)`
/// when it is invalid.
pub type FieldValidatorFn = Rc<dyn Fn(&Value) -> Option<String>>;

/// Custom record check run after every field passed: receives the full
/// candidate field map.
pub type RecordValidatorFn = Rc<dyn Fn(&Dict) -> Option<String>>;

/// Numeric range constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumSchema {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
}

impl NumSchema {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn gt(mut self, v: f64) -> Self {
        self.gt = Some(v);
        self
    }
    pub fn gte(mut self, v: f64) -> Self {
        self.gte = Some(v);
        self
    }
    pub fn lt(mut self, v: f64) -> Self {
        self.lt = Some(v);
        self
    }
    pub fn lte(mut self, v: f64) -> Self {
        self.lte = Some(v);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }

    /// Bounds rendered as `[>= lo,< hi]`, open ends as infinities.
    pub fn bounds_hint(&self) -> String {
        let lower = match (self.gte, self.gt) {
            (Some(v), _) => format!(">= {v}"),
            (None, Some(v)) => format!("> {v}"),
            (None, None) => ">= -inf".to_string(),
        };
        let upper = match (self.lte, self.lt) {
            (Some(v), _) => format!("<= {v}"),
            (None, Some(v)) => format!("< {v}"),
            (None, None) => "<= +inf".to_string(),
        };
        format!("[{lower},{upper}]")
    }
}

/// String length constraints, counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrSchema {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

/// Declared type of a record field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Any,
    Bool,
    Int(NumSchema),
    Float(NumSchema),
    Str(StrSchema),
    List {
        item: Box<FieldType>,
        min: Option<u64>,
        max: Option<u64>,
    },
    Dict {
        value: Box<FieldType>,
    },
    Record(SchemaRef),
    Optional(Box<FieldType>),
}

/// Discriminant of a [`FieldType`], used as a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Any,
    Bool,
    Int,
    Float,
    Str,
    List,
    Dict,
    Record,
}

impl FieldType {
    pub fn any() -> Self {
        FieldType::Any
    }
    pub fn bool() -> Self {
        FieldType::Bool
    }
    pub fn int() -> Self {
        FieldType::Int(NumSchema::default())
    }
    pub fn float() -> Self {
        FieldType::Float(NumSchema::default())
    }
    pub fn str() -> Self {
        FieldType::Str(StrSchema::default())
    }
    pub fn list(item: FieldType) -> Self {
        FieldType::List {
            item: Box::new(item),
            min: None,
            max: None,
        }
    }
    pub fn dict(value: FieldType) -> Self {
        FieldType::Dict {
            value: Box::new(value),
        }
    }
    pub fn record(schema: &SchemaRef) -> Self {
        FieldType::Record(schema.clone())
    }
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// The declared type with any `Optional` wrapper removed.
    pub fn unwrap_optional(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            FieldType::Any => TypeTag::Any,
            FieldType::Bool => TypeTag::Bool,
            FieldType::Int(_) => TypeTag::Int,
            FieldType::Float(_) => TypeTag::Float,
            FieldType::Str(_) => TypeTag::Str,
            FieldType::List { .. } => TypeTag::List,
            FieldType::Dict { .. } => TypeTag::Dict,
            FieldType::Record(_) => TypeTag::Record,
            FieldType::Optional(inner) => inner.tag(),
        }
    }

    /// Numeric constraints, if the type is numeric.
    pub fn num_schema(&self) -> Option<&NumSchema> {
        match self.unwrap_optional() {
            FieldType::Int(n) | FieldType::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Any => f.write_str("any"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int(_) => f.write_str("int"),
            FieldType::Float(_) => f.write_str("float"),
            FieldType::Str(_) => f.write_str("str"),
            FieldType::List { item, .. } => write!(f, "list[{item}]"),
            FieldType::Dict { value } => write!(f, "dict[str, {value}]"),
            FieldType::Record(schema) => f.write_str(&schema.name),
            FieldType::Optional(inner) => write!(f, "optional[{inner}]"),
        }
    }
}

/// Metadata for one record field. Immutable once part of a schema.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub alias: Option<String>,
    pub type_: FieldType,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub validators: Vec<(FieldValidatorFn, Option<String>)>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("type_", &self.type_)
            .field("description", &self.description)
            .field("default", &self.default)
            .field("validators_count", &self.validators.len())
            .finish()
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            type_,
            description: None,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validator<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + 'static,
    {
        self.validators.push((Rc::new(check), Some(name.into())));
        self
    }

    /// Name shown to users: the alias when present, the field name otherwise.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Type hint for display, e.g. `Field[float] [> 0,< 100000]`.
    pub fn typehint(&self) -> String {
        match self.type_.num_schema() {
            Some(bounds) => format!("Field[{}] {}", self.type_, bounds.bounds_hint()),
            None => format!("Field[{}]", self.type_),
        }
    }
}

/// Schema of a record type: an ordered list of field descriptors plus
/// record-level checks.
#[derive(Clone)]
pub struct RecordSchema {
    pub name: String,
    pub description: Option<String>,
    pub extends: Option<SchemaRef>,
    pub fields: Vec<FieldDescriptor>,
    pub validators: Vec<(RecordValidatorFn, Option<String>)>,
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("extends", &self.extends.as_ref().map(|s| &s.name))
            .field("fields", &self.fields)
            .field("validators_count", &self.validators.len())
            .finish()
    }
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> super::RecordBuilder {
        super::RecordBuilder::new(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declaration position of the field named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field whose name or alias equals `key`.
    pub fn field_by_key(&self, key: &str) -> Option<&FieldDescriptor> {
        self.field(key)
            .or_else(|| self.fields.iter().find(|f| f.alias.as_deref() == Some(key)))
    }

    /// Returns `true` if this schema is `other` or extends it.
    pub fn is_a(&self, other: &RecordSchema) -> bool {
        if self.name == other.name {
            return true;
        }
        match &self.extends {
            Some(parent) => parent.is_a(other),
            None => false,
        }
    }

    pub fn typehint(&self) -> String {
        format!("Model[{}]", self.name)
    }
}
