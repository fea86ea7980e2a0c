//! Column references.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ExprRef, Expression};
use crate::error::{ExecError, ExecResult};
use crate::row::Row;
use crate::types::{DataType, Field, Schema, Value};

/// A column reference bound to a position in the input row.
#[derive(Debug, Clone, PartialEq)]
pub struct GetField {
    index: usize,
    name: String,
    data_type: DataType,
    nullable: bool,
}

impl GetField {
    /// Creates a new bound column reference.
    pub fn new(index: usize, name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            index,
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Binds a reference to the field at `index`.
    pub fn from_field(index: usize, field: &Field) -> Self {
        Self::new(index, field.name(), field.data_type, field.nullable)
    }

    /// Binds a reference to the first field named `name` in `schema`.
    pub fn bind(schema: &Schema, name: &str) -> Option<Self> {
        let index = schema.index_of(name)?;
        schema.field(index).map(|field| Self::from_field(index, field))
    }

    /// Returns the bound row position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Wraps this reference in a shared handle.
    pub fn into_ref(self) -> ExprRef {
        Arc::new(self)
    }
}

impl Expression for GetField {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn is_nullable(&self) -> bool {
        self.nullable
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

    fn eval(&self, row: &Row) -> ExecResult<Value> {
        row.get(self.index)
            .cloned()
            .ok_or(ExecError::ColumnOutOfRange {
                index: self.index,
                len: row.len(),
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for GetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A column reference that has not been bound to a row position yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedColumn {
    name: String,
}

impl UnresolvedColumn {
    /// Creates a new unresolved column reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Wraps this reference in a shared handle.
    pub fn into_ref(self) -> ExprRef {
        Arc::new(self)
    }
}

impl Expression for UnresolvedColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_type(&self) -> DataType {
        DataType::Null
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn resolved(&self) -> bool {
        false
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
        Err(ExecError::Unresolved(format!("column {}", self.name)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for UnresolvedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
