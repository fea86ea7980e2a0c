//! Literal values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ExprRef, Expression};
use crate::error::{ExecError, ExecResult};
use crate::row::Row;
use crate::types::{DataType, Value};

/// A constant value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Value,
}

impl Literal {
    /// Creates a new literal.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Creates a NULL literal.
    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    /// Returns the literal value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Wraps this literal in a shared handle.
    pub fn into_ref(self) -> ExprRef {
        Arc::new(self)
    }
}

impl Expression for Literal {
    fn name(&self) -> &str {
        "literal"
    }

    fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    fn is_nullable(&self) -> bool {
        self.value.is_null()
    }

    fn resolved(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<ExprRef> {
        Vec::new()
    }

    fn with_new_children(&self, children: Vec<ExprRef>) -> ExecResult<ExprRef> {
        if !children.is_empty() {
            return Err(ExecError::arity(self.name(), "0", children.len()));
        }
        Ok(Arc::new(self.clone()))
    }

    fn eval(&self, _row: &Row) -> ExecResult<Value> {
        Ok(self.value.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            other => write!(f, "{}", other),
        }
    }
}
