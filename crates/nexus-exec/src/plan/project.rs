//! Projection node.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ensure_resolved, unary_child, Node, NodeRef, RowIter};
use crate::config::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::expression::ExprRef;
use crate::row::Row;
use crate::types::{Column, Field, Schema};

/// Evaluates a list of expressions against every child row.
#[derive(Debug, Clone)]
pub struct Project {
    exprs: Vec<ExprRef>,
    child: NodeRef,
}

impl Project {
    /// Creates a new projection.
    pub fn new(exprs: Vec<ExprRef>, child: NodeRef) -> Self {
        Self { exprs, child }
    }
}

impl Node for Project {
    fn name(&self) -> &str {
        "Project"
    }

    /// One field per expression, named after its rendering.
    fn schema(&self) -> Schema {
        self.exprs
            .iter()
            .map(|e| Field::new(Column::new(e.to_string()), e.data_type(), e.is_nullable()))
            .collect::<Vec<_>>()
            .into()
    }

    fn children(&self) -> Vec<NodeRef> {
        vec![self.child.clone()]
    }

    fn with_new_children(&self, children: Vec<NodeRef>) -> ExecResult<NodeRef> {
        let child = unary_child(self.name(), children)?;
        Ok(Arc::new(Self::new(self.exprs.clone(), child)))
    }

    fn expressions(&self) -> Vec<ExprRef> {
        self.exprs.clone()
    }

    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> ExecResult<NodeRef> {
        if exprs.len() != self.exprs.len() {
            return Err(ExecError::arity(
                self.name(),
                self.exprs.len().to_string(),
                exprs.len(),
            ));
        }
        Ok(Arc::new(Self::new(exprs, self.child.clone())))
    }

    fn row_iter(&self, ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>> {
        ensure_resolved(self)?;
        let child = self.child.row_iter(ctx)?;
        Ok(Box::new(ProjectIter {
            exprs: self.exprs.clone(),
            child,
            closed: false,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exprs: Vec<_> = self.exprs.iter().map(|e| e.to_string()).collect();
        write!(f, "Project: {}", exprs.join(", "))
    }
}

#[derive(Debug)]
struct ProjectIter {
    exprs: Vec<ExprRef>,
    child: Box<dyn RowIter>,
    closed: bool,
}

impl RowIter for ProjectIter {
    fn next_row(&mut self) -> ExecResult<Option<Row>> {
        if self.closed {
            return Ok(None);
        }
        match self.child.next_row()? {
            Some(row) => {
                let projected = self
                    .exprs
                    .iter()
                    .map(|e| e.eval(&row))
                    .collect::<ExecResult<Row>>()?;
                Ok(Some(projected))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) -> ExecResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.child.close()
    }
}
