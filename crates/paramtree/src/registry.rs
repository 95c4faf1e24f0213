//! Type dispatch registry.
//!
//! Two closed tables decide how a leaf is built and how raw input is parsed:
//! the field table is keyed by a record field's declared type, the primitive
//! table by a value's runtime kind. Values inside schemaless lists and
//! dictionaries, and fields declared `Any`, go through the primitive table.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use paramtree_schema::{FieldType, TypeTag, Value, ValueKind};

use crate::binding::RawInput;
use crate::error::TreeError;

/// Parses raw control input into a typed value.
pub type InterpretFn = Rc<dyn Fn(&RawInput) -> Option<Value>>;

/// Primitive type a leaf holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Bool,
    Int,
    Float,
    Str,
}

impl LeafKind {
    pub fn name(self) -> &'static str {
        match self {
            LeafKind::Bool => "bool",
            LeafKind::Int => "int",
            LeafKind::Float => "float",
            LeafKind::Str => "str",
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which kind of control a display collaborator should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetHint {
    Numeric,
    Checkbox,
    Text,
}

/// How one kind of leaf is displayed and parsed.
#[derive(Clone)]
pub struct LeafHandler {
    pub kind: LeafKind,
    pub widget: WidgetHint,
    parser: Option<InterpretFn>,
}

impl fmt::Debug for LeafHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafHandler")
            .field("kind", &self.kind)
            .field("widget", &self.widget)
            .field("has_parser", &self.parser.is_some())
            .finish()
    }
}

impl LeafHandler {
    /// A handler without a parser: its leaves display but reject all input.
    pub fn new(kind: LeafKind, widget: WidgetHint) -> Self {
        Self {
            kind,
            widget,
            parser: None,
        }
    }

    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&RawInput) -> Option<Value> + 'static,
    {
        self.parser = Some(Rc::new(parser));
        self
    }

    /// The standard handler for `kind`, with its standard parser.
    pub fn standard(kind: LeafKind) -> Self {
        match kind {
            LeafKind::Float => Self::new(kind, WidgetHint::Numeric).with_parser(parse_float),
            LeafKind::Int => Self::new(kind, WidgetHint::Numeric).with_parser(parse_int),
            LeafKind::Bool => Self::new(kind, WidgetHint::Checkbox).with_parser(parse_bool),
            LeafKind::Str => Self::new(kind, WidgetHint::Text).with_parser(parse_str),
        }
    }

    /// Turn raw input into a value of this handler's kind.
    ///
    /// # Errors
    ///
    /// [`TreeError::Interpretation`] when no parser is registered or the
    /// input cannot be coerced.
    pub fn interpret(&self, raw: &RawInput) -> Result<Value, TreeError> {
        self.parser
            .as_ref()
            .and_then(|parse| parse(raw))
            .ok_or_else(|| TreeError::Interpretation {
                expected: self.kind.name().to_string(),
                raw: raw.to_string(),
            })
    }
}

pub fn parse_float(raw: &RawInput) -> Option<Value> {
    let n = match raw {
        RawInput::Number(n) => *n,
        RawInput::Text(s) => s.trim().parse::<f64>().ok()?,
        RawInput::Flag(_) => return None,
    };
    // NaN and infinities have no JSON form.
    n.is_finite().then_some(Value::Float(n))
}

/// 2^63; `i64` holds every integral float in `[-2^63, 2^63)`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

pub fn parse_int(raw: &RawInput) -> Option<Value> {
    match raw {
        RawInput::Number(n) if n.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(n) => {
            Some(Value::Int(*n as i64))
        }
        RawInput::Number(_) => None,
        RawInput::Text(s) => s.trim().parse::<i64>().ok().map(Value::Int),
        RawInput::Flag(_) => None,
    }
}

pub fn parse_bool(raw: &RawInput) -> Option<Value> {
    match raw {
        RawInput::Flag(b) => Some(Value::Bool(*b)),
        RawInput::Number(n) if *n == 0.0 || *n == 1.0 => Some(Value::Bool(*n == 1.0)),
        RawInput::Number(_) => None,
        RawInput::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

pub fn parse_str(raw: &RawInput) -> Option<Value> {
    Some(Value::Str(raw.to_string()))
}

/// Dispatch tables from types to leaf handlers.
#[derive(Debug, Clone)]
pub struct Registry {
    fields: BTreeMap<TypeTag, LeafHandler>,
    primitives: BTreeMap<ValueKind, LeafHandler>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// A registry with no entries. Every leaf is unsupported until
    /// something is registered.
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
            primitives: BTreeMap::new(),
        }
    }

    /// Float, int, bool and str in both tables.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        let pairs = [
            (TypeTag::Float, ValueKind::Float, LeafKind::Float),
            (TypeTag::Int, ValueKind::Int, LeafKind::Int),
            (TypeTag::Bool, ValueKind::Bool, LeafKind::Bool),
            (TypeTag::Str, ValueKind::Str, LeafKind::Str),
        ];
        for (tag, kind, leaf) in pairs {
            registry.register_field(tag, LeafHandler::standard(leaf));
            registry.register_primitive(kind, LeafHandler::standard(leaf));
        }
        registry
    }

    /// Register (or replace) the handler for fields declared as `tag`.
    pub fn register_field(&mut self, tag: TypeTag, handler: LeafHandler) -> Option<LeafHandler> {
        self.fields.insert(tag, handler)
    }

    /// Register (or replace) the handler for runtime values of `kind`.
    pub fn register_primitive(
        &mut self,
        kind: ValueKind,
        handler: LeafHandler,
    ) -> Option<LeafHandler> {
        self.primitives.insert(kind, handler)
    }

    pub fn unregister_field(&mut self, tag: TypeTag) -> Option<LeafHandler> {
        self.fields.remove(&tag)
    }

    pub fn unregister_primitive(&mut self, kind: ValueKind) -> Option<LeafHandler> {
        self.primitives.remove(&kind)
    }

    /// Handler for a schemaless value.
    pub fn primitive_handler(&self, kind: ValueKind) -> Option<&LeafHandler> {
        self.primitives.get(&kind)
    }

    /// Handler for a value declared as `declared`. `Any` falls back to the
    /// primitive table keyed by the runtime kind.
    pub fn field_handler(&self, declared: &FieldType, value: &Value) -> Option<&LeafHandler> {
        match declared.unwrap_optional() {
            FieldType::Any => self.primitive_handler(value.kind()),
            other => self.fields.get(&other.tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawInput {
        RawInput::Text(s.to_string())
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(&text(" 4.5 ")), Some(Value::Float(4.5)));
        assert_eq!(parse_float(&text("abc")), None);
        assert_eq!(parse_float(&RawInput::Number(3.0)), Some(Value::Float(3.0)));
        assert_eq!(parse_float(&RawInput::Flag(true)), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(&text("42")), Some(Value::Int(42)));
        assert_eq!(parse_int(&text("4.2")), None);
        assert_eq!(parse_int(&RawInput::Number(7.0)), Some(Value::Int(7)));
        assert_eq!(parse_int(&RawInput::Number(7.5)), None);
    }

    #[test]
    fn test_parse_float_rejects_non_finite() {
        assert_eq!(parse_float(&text("NaN")), None);
        assert_eq!(parse_float(&text("inf")), None);
        assert_eq!(parse_float(&text("-infinity")), None);
        assert_eq!(parse_float(&RawInput::Number(f64::NAN)), None);
        assert_eq!(parse_float(&RawInput::Number(f64::NEG_INFINITY)), None);
        assert_eq!(parse_float(&text("1e308")), Some(Value::Float(1e308)));
    }

    #[test]
    fn test_parse_int_range() {
        assert_eq!(parse_int(&RawInput::Number(1e20)), None);
        assert_eq!(parse_int(&RawInput::Number(i64::MAX as f64)), None);
        assert_eq!(parse_int(&RawInput::Number(f64::INFINITY)), None);
        assert_eq!(
            parse_int(&RawInput::Number(i64::MIN as f64)),
            Some(Value::Int(i64::MIN))
        );
        assert_eq!(parse_int(&text("9223372036854775808")), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(&text("Yes")), Some(Value::Bool(true)));
        assert_eq!(parse_bool(&text("0")), Some(Value::Bool(false)));
        assert_eq!(parse_bool(&text("maybe")), None);
        assert_eq!(parse_bool(&RawInput::Flag(false)), Some(Value::Bool(false)));
    }

    #[test]
    fn test_parse_str_accepts_everything() {
        assert_eq!(parse_str(&RawInput::Number(1.5)), Some(Value::from("1.5")));
        assert_eq!(parse_str(&RawInput::Flag(true)), Some(Value::from("true")));
    }

    #[test]
    fn test_handler_without_parser_rejects_input() {
        let handler = LeafHandler::new(LeafKind::Float, WidgetHint::Numeric);
        let err = handler.interpret(&text("1.0")).unwrap_err();
        assert!(matches!(err, TreeError::Interpretation { .. }));
    }

    #[test]
    fn test_any_falls_back_to_runtime_kind() {
        let registry = Registry::standard();
        let handler = registry
            .field_handler(&FieldType::any(), &Value::Bool(true))
            .unwrap();
        assert_eq!(handler.kind, LeafKind::Bool);
        assert!(registry
            .field_handler(&FieldType::any(), &Value::Null)
            .is_none());
        let handler = registry
            .field_handler(&FieldType::optional(FieldType::int()), &Value::Int(1))
            .unwrap();
        assert_eq!(handler.kind, LeafKind::Int);
    }

    #[test]
    fn test_unregister() {
        let mut registry = Registry::standard();
        assert!(registry.unregister_field(TypeTag::Str).is_some());
        assert!(registry
            .field_handler(&FieldType::str(), &Value::from("x"))
            .is_none());
    }
}
