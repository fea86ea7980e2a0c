//! Filter node.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ensure_resolved, unary_child, Node, NodeRef, RowIter};
use crate::config::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::expression::ExprRef;
use crate::row::Row;
use crate::types::{DataType, Schema, Value};

/// Passes through child rows whose predicate is true.
///
/// The predicate is converted to a boolean; NULL and false both drop the row.
#[derive(Debug, Clone)]
pub struct Filter {
    predicate: ExprRef,
    child: NodeRef,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(predicate: ExprRef, child: NodeRef) -> Self {
        Self { predicate, child }
    }
}

impl Node for Filter {
    fn name(&self) -> &str {
        "Filter"
    }

    fn schema(&self) -> Schema {
        self.child.schema()
    }

    fn children(&self) -> Vec<NodeRef> {
        vec![self.child.clone()]
    }

    fn with_new_children(&self, children: Vec<NodeRef>) -> ExecResult<NodeRef> {
        let child = unary_child(self.name(), children)?;
        Ok(Arc::new(Self::new(self.predicate.clone(), child)))
    }

    fn expressions(&self) -> Vec<ExprRef> {
        vec![self.predicate.clone()]
    }

    fn with_new_expressions(&self, mut exprs: Vec<ExprRef>) -> ExecResult<NodeRef> {
        if exprs.len() != 1 {
            return Err(ExecError::arity(self.name(), "1", exprs.len()));
        }
        Ok(Arc::new(Self::new(exprs.remove(0), self.child.clone())))
    }

    fn row_iter(&self, ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>> {
        ensure_resolved(self)?;
        let child = self.child.row_iter(ctx)?;
        Ok(Box::new(FilterIter {
            predicate: self.predicate.clone(),
            child,
            closed: false,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filter: {}", self.predicate)
    }
}

#[derive(Debug)]
struct FilterIter {
    predicate: ExprRef,
    child: Box<dyn RowIter>,
    closed: bool,
}

impl RowIter for FilterIter {
    fn next_row(&mut self) -> ExecResult<Option<Row>> {
        if self.closed {
            return Ok(None);
        }
        while let Some(row) = self.child.next_row()? {
            let keep = DataType::Boolean.convert(&self.predicate.eval(&row)?)?;
            if keep == Value::Boolean(true) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> ExecResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.child.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::GetField;
    use crate::function::IsBinary;
    use crate::plan::{drain, MemoryTable};
    use crate::row;
    use crate::types::Field;

    fn files() -> NodeRef {
        Arc::new(MemoryTable::new(
            "files",
            Schema::new(vec![
                Field::not_null("path", DataType::Text),
                Field::nullable("content", DataType::Blob),
            ]),
            vec![
                row!["a.txt", b"plain".to_vec()],
                row!["b.bin", vec![0x7fu8, 0x00, 0x01]],
                row!["c.txt", Value::Null],
            ],
        ))
    }

    #[test]
    fn test_filter_keeps_true_rows() {
        let predicate: ExprRef = Arc::new(IsBinary::new(Arc::new(GetField::new(
            1,
            "content",
            DataType::Blob,
            true,
        ))));
        let filter = Filter::new(predicate, files());
        assert_eq!(filter.to_string(), "Filter: is_binary(content)");

        let mut iter = filter.row_iter(&ExecutionContext::default()).unwrap();
        let rows = drain(iter.as_mut()).unwrap();
        iter.close().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), Some(&Value::text("b.bin")));
    }

    #[test]
    fn test_null_predicate_drops_row() {
        let table: NodeRef = Arc::new(MemoryTable::new(
            "flags",
            Schema::new(vec![Field::nullable("flag", DataType::Boolean)]),
            vec![row![true], row![Value::Null], row![false]],
        ));
        let filter = Filter::new(
            Arc::new(GetField::new(0, "flag", DataType::Boolean, true)),
            table,
        );
        let mut iter = filter.row_iter(&ExecutionContext::default()).unwrap();
        assert_eq!(drain(iter.as_mut()).unwrap(), vec![row![true]]);
        iter.close().unwrap();
    }
}
