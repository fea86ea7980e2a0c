//! IS_BINARY function - sniffs a value for binary content

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{fmt_call, FunctionRegistry};
use crate::error::{ExecError, ExecResult};
use crate::expression::{unary_child, ExprRef, Expression};
use crate::row::Row;
use crate::types::{DataType, Value};

/// Number of leading bytes inspected for a zero byte.
pub const SNIFF_LEN: usize = 8000;

/// Returns true if its argument contains a zero byte in its first
/// [`SNIFF_LEN`] bytes. NULL is not binary.
#[derive(Debug, Clone)]
pub struct IsBinary {
    child: ExprRef,
}

impl IsBinary {
    /// Creates a new `is_binary` expression.
    pub fn new(child: ExprRef) -> Self {
        Self { child }
    }
}

fn is_binary(bytes: &[u8]) -> bool {
    let end = bytes.len().min(SNIFF_LEN);
    bytes[..end].contains(&0)
}

/// Inspects a value already converted to a blob.
fn sniff(value: Value) -> ExecResult<Value> {
    match value {
        Value::Blob(bytes) => Ok(Value::Boolean(is_binary(&bytes))),
        other => Err(ExecError::InvalidType(other.type_name().to_string())),
    }
}

impl Expression for IsBinary {
    fn name(&self) -> &str {
        "is_binary"
    }

    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![self.child.clone()]
    }

    fn with_new_children(&self, children: Vec<ExprRef>) -> ExecResult<ExprRef> {
        Ok(Arc::new(Self::new(unary_child(self.name(), children)?)))
    }

    fn eval(&self, row: &Row) -> ExecResult<Value> {
        let value = self.child.eval(row)?;
        if value.is_null() {
            return Ok(Value::Boolean(false));
        }

        sniff(DataType::Blob.convert(&value)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for IsBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_call(f, self.name(), std::slice::from_ref(&self.child))
    }
}

fn build(args: Vec<ExprRef>) -> ExecResult<ExprRef> {
    Ok(Arc::new(IsBinary::new(unary_child("is_binary", args)?)))
}

/// Register the function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register("is_binary", build);
}
