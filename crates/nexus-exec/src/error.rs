//! Error types for expression evaluation and plan execution.
//!
//! Construction-time failures (arity) and evaluation-time failures (type,
//! conversion, iterator) share one enum so that `?` carries either through
//! the executor unchanged.

use thiserror::Error;

use crate::types::{DataType, Value};

/// Result type alias for execution operations.
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// Error raised by the type system when a value cannot be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value's kind has no conversion into the target type.
    #[error("cannot convert {value_type} value '{value}' to {target}")]
    Incompatible {
        /// Target type of the conversion.
        target: DataType,
        /// Runtime type name of the offending value.
        value_type: &'static str,
        /// Rendered offending value.
        value: String,
    },

    /// Text could not be parsed as the target type.
    #[error("cannot parse '{input}' as {target}")]
    Unparseable {
        /// Target type of the conversion.
        target: DataType,
        /// Offending text.
        input: String,
    },

    /// Integer does not fit the target width.
    #[error("value {value} is out of range for {target}")]
    OutOfRange {
        /// Target type of the conversion.
        target: DataType,
        /// Offending integer.
        value: i64,
    },
}

impl ConversionError {
    /// Creates an incompatible-kind error for `value`.
    pub fn incompatible(target: DataType, value: &Value) -> Self {
        ConversionError::Incompatible {
            target,
            value_type: value.type_name(),
            value: value.to_string(),
        }
    }

    /// Creates a parse error for `input`.
    pub fn unparseable(target: DataType, input: impl Into<String>) -> Self {
        ConversionError::Unparseable {
            target,
            input: input.into(),
        }
    }
}

/// Error type for expression evaluation and plan execution.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A function was built with the wrong number of arguments.
    #[error("function {function} expects {expected} argument(s), got {actual}")]
    Arity {
        /// Function or node name.
        function: String,
        /// Accepted argument counts, e.g. "2 or 3".
        expected: String,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// A value cannot be interpreted as the input kind an expression needs.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// The type system rejected a coercion.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Evaluation or iteration was requested on an unresolved tree.
    #[error("unresolved: {0}")]
    Unresolved(String),

    /// A column reference points past the end of the row.
    #[error("column index {index} out of range for row of length {len}")]
    ColumnOutOfRange {
        /// Bound column position.
        index: usize,
        /// Length of the row being evaluated.
        len: usize,
    },

    /// No function is registered under this name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A configured limit was exceeded.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Failure reported by a row source.
    #[error("iterator error: {0}")]
    Iterator(String),
}

impl ExecError {
    /// Creates an arity error.
    pub fn arity(function: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        ExecError::Arity {
            function: function.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Returns true if this error was raised while building a tree rather
    /// than while producing rows.
    pub fn is_construction_error(&self) -> bool {
        matches!(self, ExecError::Arity { .. } | ExecError::UnknownFunction(_))
    }
}
