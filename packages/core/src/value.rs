//! The Value type - the untyped input handed over by script code.
//!
//! Script runtimes marshal their objects into this tree before calling a
//! client. The decoder then turns it into one of the typed requests.

use std::collections::BTreeMap;

/// A dynamically-typed tree produced by script code.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering (stable error reporting)
/// - Includes `Bytes` for binary payloads (scripts may pass typed arrays)
/// - Uses `i64` for integers, matching what script numbers usually become
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value. Decoding treats it like a missing field.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Short name of this value's kind, as used in decode errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Render a scalar for an error message.
    ///
    /// Containers are summarized by kind and length rather than dumped.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("bytes[{}]", b.len()),
            Value::Array(a) => format!("array[{}]", a.len()),
            Value::Map(m) => format!("map[{}]", m.len()),
        }
    }

    /// Insert a field into a map value, returning the map for chaining.
    ///
    /// Non-map values are replaced by a fresh map first.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !self.is_map() {
            self = Value::map();
        }
        if let Value::Map(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}
