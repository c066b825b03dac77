//! Heterogeneous attribute payloads stored on segments.

use std::fmt;
use std::sync::Arc;

/// Any displayable value that can be stored as an opaque attribute.
pub trait OpaqueAttribute: fmt::Display + fmt::Debug + Send + Sync {}

impl<T: fmt::Display + fmt::Debug + Send + Sync> OpaqueAttribute for T {}

/// A single attribute value; exactly one variant is populated.
#[derive(Clone)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Char(char),
    Text(String),
    Opaque(Arc<dyn OpaqueAttribute>),
}

impl AttributeValue {
    pub fn opaque<T: OpaqueAttribute + 'static>(value: T) -> Self {
        AttributeValue::Opaque(Arc::new(value))
    }

    /// Renders the populated variant as text.
    pub fn get(&self) -> String {
        match self {
            AttributeValue::Int(i) => i.to_string(),
            // Debug keeps the fractional part: 1.0 instead of 1
            AttributeValue::Float(d) => format!("{:?}", d),
            AttributeValue::Char(c) => c.to_string(),
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Opaque(o) => o.to_string(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            AttributeValue::Float(d) => f.debug_tuple("Float").field(d).finish(),
            AttributeValue::Char(c) => f.debug_tuple("Char").field(c).finish(),
            AttributeValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            AttributeValue::Opaque(o) => f.debug_tuple("Opaque").field(o).finish(),
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttributeValue::Int(a), AttributeValue::Int(b)) => a == b,
            (AttributeValue::Float(a), AttributeValue::Float(b)) => a == b,
            (AttributeValue::Char(a), AttributeValue::Char(b)) => a == b,
            (AttributeValue::Text(a), AttributeValue::Text(b)) => a == b,
            (AttributeValue::Opaque(a), AttributeValue::Opaque(b)) => {
                Arc::ptr_eq(a, b) || a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<char> for AttributeValue {
    fn from(value: char) -> Self {
        AttributeValue::Char(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}
