//! Declared data types and the conversions between them.
//!
//! Every type exposes `convert`, which coerces a runtime value into that
//! type or fails with a [`ConversionError`]. NULL converts to NULL for every
//! type; the caller decides what NULL means.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::{DATE_LAYOUT, TIMESTAMP_LAYOUT};
use super::Value;
use crate::error::ConversionError;

/// SQL data types understood by the execution core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of the NULL literal.
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Unlimited UTF-8 text.
    Text,
    /// Binary data.
    Blob,
    /// Calendar date, carried as a timestamp at midnight.
    Date,
    /// Timestamp (date + time).
    Timestamp,
}

impl DataType {
    /// Returns the SQL name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Null => "NULL",
            DataType::Boolean => "BOOLEAN",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
        }
    }

    /// Returns true if this type is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int32 | DataType::Int64)
    }

    /// Returns true if this type is a textual type.
    pub fn is_textual(&self) -> bool {
        matches!(self, DataType::Text | DataType::Blob)
    }

    /// Coerces `value` into this type.
    pub fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match self {
            DataType::Null => match value {
                Value::Null => Ok(Value::Null),
                other => Err(ConversionError::incompatible(*self, other)),
            },
            DataType::Boolean => to_boolean(value),
            DataType::Int32 => to_int32(value),
            DataType::Int64 => to_int64(value),
            DataType::Text => to_text(value),
            DataType::Blob => to_blob(value),
            DataType::Date => to_date(value),
            DataType::Timestamp => to_timestamp(value, DataType::Timestamp),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn to_boolean(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Boolean(b) => Ok(Value::Boolean(*b)),
        Value::Int32(i) => Ok(Value::Boolean(*i != 0)),
        Value::Int64(i) => Ok(Value::Boolean(*i != 0)),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Boolean(true)),
            "false" | "0" => Ok(Value::Boolean(false)),
            _ => Err(ConversionError::unparseable(DataType::Boolean, s.as_str())),
        },
        Value::Blob(_) | Value::Timestamp(_) => {
            Err(ConversionError::incompatible(DataType::Boolean, value))
        }
    }
}

fn to_int32(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Boolean(b) => Ok(Value::Int32(i32::from(*b))),
        Value::Int32(i) => Ok(Value::Int32(*i)),
        Value::Int64(i) => i32::try_from(*i)
            .map(Value::Int32)
            .map_err(|_| ConversionError::OutOfRange {
                target: DataType::Int32,
                value: *i,
            }),
        Value::Text(s) => s
            .trim()
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|_| ConversionError::unparseable(DataType::Int32, s.as_str())),
        Value::Blob(_) | Value::Timestamp(_) => {
            Err(ConversionError::incompatible(DataType::Int32, value))
        }
    }
}

fn to_int64(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Boolean(b) => Ok(Value::Int64(i64::from(*b))),
        Value::Int32(i) => Ok(Value::Int64(i64::from(*i))),
        Value::Int64(i) => Ok(Value::Int64(*i)),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|_| ConversionError::unparseable(DataType::Int64, s.as_str())),
        Value::Blob(_) | Value::Timestamp(_) => {
            Err(ConversionError::incompatible(DataType::Int64, value))
        }
    }
}

fn to_text(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Boolean(_) | Value::Int32(_) | Value::Int64(_) | Value::Timestamp(_) => {
            Ok(Value::Text(value.to_string()))
        }
        Value::Text(s) => Ok(Value::Text(s.clone())),
        Value::Blob(b) => String::from_utf8(b.clone())
            .map(Value::Text)
            .map_err(|_| ConversionError::incompatible(DataType::Text, value)),
    }
}

fn to_blob(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Blob(b) => Ok(Value::Blob(b.clone())),
        other => match to_text(other)? {
            Value::Text(s) => Ok(Value::Blob(s.into_bytes())),
            converted => Ok(converted),
        },
    }
}

fn to_date(value: &Value) -> Result<Value, ConversionError> {
    match to_timestamp(value, DataType::Date)? {
        Value::Timestamp(ts) => Ok(Value::Timestamp(ts.date().and_time(NaiveTime::MIN))),
        other => Ok(other),
    }
}

fn to_timestamp(value: &Value, target: DataType) -> Result<Value, ConversionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Timestamp(ts) => Ok(Value::Timestamp(*ts)),
        Value::Text(s) => parse_timestamp(s)
            .map(Value::Timestamp)
            .ok_or_else(|| ConversionError::unparseable(target, s.as_str())),
        Value::Int32(secs) => from_unix_seconds(i64::from(*secs), target),
        Value::Int64(secs) => from_unix_seconds(*secs, target),
        Value::Boolean(_) | Value::Blob(_) => Err(ConversionError::incompatible(target, value)),
    }
}

fn from_unix_seconds(secs: i64, target: DataType) -> Result<Value, ConversionError> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| Value::Timestamp(dt.naive_utc()))
        .ok_or(ConversionError::OutOfRange {
            target,
            value: secs,
        })
}

/// Parses the timestamp layouts accepted by the Date and Timestamp types.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_LAYOUT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDate::parse_from_str(s, DATE_LAYOUT).map(|d| d.and_time(NaiveTime::MIN)))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}
