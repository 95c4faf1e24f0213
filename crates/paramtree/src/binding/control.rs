use std::fmt;

use paramtree_schema::Value;

/// Raw input as a display control reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl RawInput {
    /// How a control should display `value`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(b) => RawInput::Flag(*b),
            Value::Int(i) => RawInput::Number(*i as f64),
            Value::Float(f) => RawInput::Number(*f),
            Value::Str(s) => RawInput::Text(s.clone()),
            other => RawInput::Text(other.render()),
        }
    }
}

impl fmt::Display for RawInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInput::Text(s) => f.write_str(s),
            RawInput::Number(n) => write!(f, "{n}"),
            RawInput::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        RawInput::Text(s.to_string())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        RawInput::Text(s)
    }
}

impl From<f64> for RawInput {
    fn from(n: f64) -> Self {
        RawInput::Number(n)
    }
}

impl From<bool> for RawInput {
    fn from(b: bool) -> Self {
        RawInput::Flag(b)
    }
}

/// A control rendering one leaf: a text box, spin box, checkbox.
///
/// Controls do not call back into the binding. The host forwards a
/// control's change notification by calling
/// [`Binding::control_changed`](super::Binding::control_changed), or
/// [`Binding::control_changing`](super::Binding::control_changing) for
/// previews that must not commit.
pub trait DisplayControl {
    fn value(&self) -> RawInput;
    fn set_value(&mut self, raw: RawInput);
}

/// A control that stores its value as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextControl {
    pub text: String,
}

impl TextControl {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DisplayControl for TextControl {
    fn value(&self) -> RawInput {
        RawInput::Text(self.text.clone())
    }

    fn set_value(&mut self, raw: RawInput) {
        self.text = raw.to_string();
    }
}
