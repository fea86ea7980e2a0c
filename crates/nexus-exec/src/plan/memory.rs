//! In-memory tables and unresolved table references.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{Node, NodeRef, RowIter};
use crate::config::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::row::Row;
use crate::types::Schema;

/// A resolved leaf that replays a fixed set of rows in order.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    schema: Schema,
    rows: Arc<Vec<Row>>,
}

impl MemoryTable {
    /// Creates a new in-memory table.
    pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Arc::new(rows),
        }
    }

    /// Creates an empty table.
    pub fn empty(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, schema, Vec::new())
    }

    /// Returns the table rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl Node for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Schema {
        self.schema.clone()
    }

    fn resolved(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<NodeRef> {
        Vec::new()
    }

    fn with_new_children(&self, children: Vec<NodeRef>) -> ExecResult<NodeRef> {
        if !children.is_empty() {
            return Err(ExecError::arity(self.name(), "0", children.len()));
        }
        Ok(Arc::new(self.clone()))
    }

    fn row_iter(&self, _ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>> {
        tracing::trace!("opening memory table {} ({} rows)", self.name, self.rows.len());
        Ok(Box::new(MemoryIter {
            rows: Arc::clone(&self.rows),
            pos: 0,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for MemoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryTable: {}", self.name)
    }
}

#[derive(Debug)]
struct MemoryIter {
    rows: Arc<Vec<Row>>,
    pos: usize,
}

impl RowIter for MemoryIter {
    fn next_row(&mut self) -> ExecResult<Option<Row>> {
        let row = self.rows.get(self.pos).cloned();
        if row.is_some() {
            self.pos += 1;
        }
        Ok(row)
    }

    fn close(&mut self) -> ExecResult<()> {
        self.pos = self.rows.len();
        Ok(())
    }
}

/// A table reference that has not been bound to a source yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTable {
    name: String,
}

impl UnresolvedTable {
    /// Creates a new unresolved table reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Node for UnresolvedTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Schema {
        Schema::empty()
    }

    fn resolved(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<NodeRef> {
        Vec::new()
    }

    fn with_new_children(&self, children: Vec<NodeRef>) -> ExecResult<NodeRef> {
        if !children.is_empty() {
            return Err(ExecError::arity(self.name(), "0", children.len()));
        }
        Ok(Arc::new(self.clone()))
    }

    fn row_iter(&self, _ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>> {
        Err(ExecError::Unresolved(format!("table {}", self.name)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for UnresolvedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnresolvedTable: {}", self.name)
    }
}
