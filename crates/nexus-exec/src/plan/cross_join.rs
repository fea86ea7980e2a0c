//! Cross (cartesian) join.
//!
//! The right side is drained into memory on the first pull so it can be
//! replayed once per left row. The left side is streamed one row at a time
//! and never buffered. Output is left-major: every right row is emitted for
//! the current left row before the next left row is pulled.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ensure_resolved, Node, NodeRef, RowIter};
use crate::config::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::row::Row;
use crate::types::Schema;

/// Cartesian product of two plans.
#[derive(Debug, Clone)]
pub struct CrossJoin {
    left: NodeRef,
    right: NodeRef,
}

impl CrossJoin {
    /// Creates a new cross join.
    pub fn new(left: NodeRef, right: NodeRef) -> Self {
        Self { left, right }
    }

    /// Returns the left input.
    pub fn left(&self) -> &NodeRef {
        &self.left
    }

    /// Returns the right input.
    pub fn right(&self) -> &NodeRef {
        &self.right
    }
}

impl Node for CrossJoin {
    fn name(&self) -> &str {
        "CrossJoin"
    }

    fn schema(&self) -> Schema {
        self.left.schema().concat(&self.right.schema())
    }

    fn resolved(&self) -> bool {
        self.left.resolved() && self.right.resolved()
    }

    fn children(&self) -> Vec<NodeRef> {
        vec![self.left.clone(), self.right.clone()]
    }

    fn with_new_children(&self, children: Vec<NodeRef>) -> ExecResult<NodeRef> {
        let given = children.len();
        let mut children = children.into_iter();
        match (children.next(), children.next(), children.next()) {
            (Some(left), Some(right), None) => Ok(Arc::new(Self::new(left, right))),
            _ => Err(ExecError::arity(self.name(), "2", given)),
        }
    }

    fn row_iter(&self, ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>> {
        ensure_resolved(self)?;

        let mut left = self.left.row_iter(ctx)?;
        let right = match self.right.row_iter(ctx) {
            Ok(iter) => iter,
            Err(e) => {
                if let Err(close_err) = left.close() {
                    tracing::warn!("failed to close cross join left side: {}", close_err);
                }
                return Err(e);
            }
        };

        tracing::trace!("opened cross join iterators");
        Ok(Box::new(CrossJoinIter::new(
            left,
            right,
            ctx.config().max_buffered_rows,
        )))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for CrossJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CrossJoin")
    }
}

/// Row iterator for [`CrossJoin`].
#[derive(Debug)]
pub struct CrossJoinIter {
    left: Box<dyn RowIter>,
    right: Box<dyn RowIter>,
    /// Buffered right side, filled on the first pull.
    right_rows: Vec<Row>,
    right_buffered: bool,
    /// Set when buffering the right side failed; later pulls keep failing.
    right_failed: bool,
    /// Left row currently being paired with `right_rows[index]`.
    left_row: Option<Row>,
    index: usize,
    max_buffered_rows: Option<usize>,
    closed: bool,
}

impl CrossJoinIter {
    /// Creates a new cross join iterator over already opened inputs.
    pub fn new(
        left: Box<dyn RowIter>,
        right: Box<dyn RowIter>,
        max_buffered_rows: Option<usize>,
    ) -> Self {
        Self {
            left,
            right,
            right_rows: Vec::new(),
            right_buffered: false,
            right_failed: false,
            left_row: None,
            index: 0,
            max_buffered_rows,
            closed: false,
        }
    }

    fn buffer_right(&mut self) -> ExecResult<()> {
        while let Some(row) = self.right.next_row()? {
            if let Some(cap) = self.max_buffered_rows {
                if self.right_rows.len() >= cap {
                    return Err(ExecError::ResourceExhausted(format!(
                        "cross join right side exceeds {} buffered rows",
                        cap
                    )));
                }
            }
            self.right_rows.push(row);
        }
        self.right_buffered = true;
        tracing::debug!(
            "cross join buffered {} right rows",
            self.right_rows.len()
        );
        Ok(())
    }
}

impl RowIter for CrossJoinIter {
    fn next_row(&mut self) -> ExecResult<Option<Row>> {
        if self.closed {
            return Ok(None);
        }
        if self.right_failed {
            return Err(ExecError::Iterator(
                "cross join right side failed while buffering".to_string(),
            ));
        }
        if !self.right_buffered {
            if let Err(e) = self.buffer_right() {
                self.right_rows = Vec::new();
                self.right_failed = true;
                return Err(e);
            }
        }
        if self.right_rows.is_empty() {
            return Ok(None);
        }

        let left_row = match self.left_row.take() {
            Some(row) => row,
            None => match self.left.next_row()? {
                Some(row) => row,
                None => return Ok(None),
            },
        };

        let row = left_row.concat(&self.right_rows[self.index]);
        self.index += 1;
        if self.index < self.right_rows.len() {
            self.left_row = Some(left_row);
        } else {
            self.index = 0;
        }
        Ok(Some(row))
    }

    /// Closes both inputs. The right side is closed even when closing the
    /// left side fails; the left error is the one returned.
    fn close(&mut self) -> ExecResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.right_rows = Vec::new();
        self.left_row = None;

        let left = self.left.close();
        let right = self.right.close();
        match (left, right) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(left_err), Err(right_err)) => {
                tracing::warn!(
                    "failed to close cross join right side after left side failed: {}",
                    right_err
                );
                Err(left_err)
            }
        }
    }
}
