//! YEAR function - extracts the calendar year of a date

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::Datelike;

use super::{fmt_call, FunctionRegistry};
use crate::error::{ExecError, ExecResult};
use crate::expression::{unary_child, ExprRef, Expression};
use crate::row::Row;
use crate::types::{DataType, Value};

/// Returns the year of its argument as an `Int32`.
///
/// Timestamps carry no zone; the year is read off the UTC calendar.
#[derive(Debug, Clone)]
pub struct Year {
    child: ExprRef,
}

impl Year {
    /// Creates a new `year` expression.
    pub fn new(child: ExprRef) -> Self {
        Self { child }
    }
}

/// Reads the year off a value already converted to a date.
fn year_of(value: Value) -> ExecResult<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Timestamp(ts) => Ok(Value::Int32(ts.year())),
        other => Err(ExecError::InvalidType(other.type_name().to_string())),
    }
}

impl Expression for Year {
    fn name(&self) -> &str {
        "year"
    }

    fn data_type(&self) -> DataType {
        DataType::Int32
    }

    fn is_nullable(&self) -> bool {
        self.child.is_nullable()
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![self.child.clone()]
    }

    fn with_new_children(&self, children: Vec<ExprRef>) -> ExecResult<ExprRef> {
        Ok(Arc::new(Self::new(unary_child(self.name(), children)?)))
    }

    fn eval(&self, row: &Row) -> ExecResult<Value> {
        let value = self.child.eval(row)?;
        year_of(DataType::Date.convert(&value)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_call(f, self.name(), std::slice::from_ref(&self.child))
    }
}

fn build(args: Vec<ExprRef>) -> ExecResult<ExprRef> {
    Ok(Arc::new(Year::new(unary_child("year", args)?)))
}

/// Register the function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register("year", build);
}
