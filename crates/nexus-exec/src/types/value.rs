//! Runtime values for expression evaluation.
//!
//! This module defines the `Value` type which represents SQL values flowing
//! through rows and expressions.

use std::fmt;

use chrono::NaiveDateTime;

use super::DataType;

/// Layout used to render and parse timestamps.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout used to parse dates.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// A runtime value.
///
/// Values are immutable once produced; timestamps carry no offset and are
/// read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// UTF-8 text.
    Text(String),
    /// Opaque byte sequence.
    Blob(Vec<u8>),
    /// Timestamp.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Creates a NULL value.
    pub fn null() -> Self {
        Value::Null
    }

    /// Creates a boolean value.
    pub fn boolean(v: bool) -> Self {
        Value::Boolean(v)
    }

    /// Creates a 32-bit integer value.
    pub fn int(v: i32) -> Self {
        Value::Int32(v)
    }

    /// Creates a 64-bit integer value.
    pub fn bigint(v: i64) -> Self {
        Value::Int64(v)
    }

    /// Creates a text value.
    pub fn text(v: impl Into<String>) -> Self {
        Value::Text(v.into())
    }

    /// Creates a blob value.
    pub fn blob(v: impl Into<Vec<u8>>) -> Self {
        Value::Blob(v.into())
    }

    /// Creates a timestamp value.
    pub fn timestamp(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the declared type this value belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Text(_) => DataType::Text,
            Value::Blob(_) => DataType::Blob,
            Value::Timestamp(_) => DataType::Timestamp,
        }
    }

    /// Returns the runtime type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Returns the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_LAYOUT)),
        }
    }
}

/// Helper module for hex encoding (simple implementation).
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_value_null() {
        let v = Value::null();
        assert!(v.is_null());
        assert_eq!(v.data_type(), DataType::Null);
        assert_eq!(v.to_string(), "NULL");
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::int(1).type_name(), "int32");
        assert_eq!(Value::bigint(1).type_name(), "int64");
        assert_eq!(Value::blob(vec![1u8]).type_name(), "blob");
        assert_eq!(Value::text("a").data_type(), DataType::Text);
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::text("x"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::blob(vec![0x00, 0xab]).to_string(), "0x00ab");
        let ts = NaiveDate::from_ymd_opt(2021, 7, 4)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(Value::timestamp(ts).to_string(), "2021-07-04 12:30:00");
    }

    #[test]
    fn test_value_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Value::int(1), "one");
        map.insert(Value::text("two"), "two");

        assert_eq!(map.get(&Value::int(1)), Some(&"one"));
        assert_eq!(map.get(&Value::text("two")), Some(&"two"));
        assert_eq!(map.get(&Value::bigint(1)), None);
    }
}
