//! Dynamically typed cell values.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell in a [`super::Frame`].
///
/// Staged datasets are schema-on-read, so every cell carries its own type.
/// CSV rendering keeps enough shape for a round trip: `Null` is an empty
/// field and floats always carry a decimal point.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Parse a CSV field back into a typed value.
    ///
    /// Empty fields are nulls. Digit strings that would not re-render
    /// identically (leading zeros, an explicit `+` sign) stay text: phone
    /// numbers like `08123456789` must survive a staging round trip
    /// unchanged.
    pub fn infer(field: &str) -> Value {
        if field.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = field.parse::<i64>() {
            if i.to_string() == field {
                return Value::Int(i);
            }
            return Value::Text(field.to_string());
        }
        if let Ok(f) = field.parse::<f64>() {
            if !field.starts_with('+') {
                return Value::Float(f);
            }
        }
        Value::Text(field.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => {
                let rendered = v.to_string();
                if rendered.contains(['.', 'e', 'n', 'N']) {
                    f.write_str(&rendered)
                } else {
                    write!(f, "{rendered}.0")
                }
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bit equality so frames with float cells stay hashable.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int(i) => i.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}
