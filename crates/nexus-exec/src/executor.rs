//! Query execution.
//!
//! [`QueryExecutor`] opens the root iterator of a resolved plan, drains it
//! and always closes it, returning the collected rows.

use std::time::{Duration, Instant};

use crate::config::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::plan::{drain, NodeRef};
use crate::row::Row;
use crate::tree::TreeNode;
use crate::types::Schema;

/// Execution metrics collected during query processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionMetrics {
    /// Number of rows returned by the root iterator.
    pub rows_returned: usize,
    /// Number of plan nodes in the executed tree.
    pub plan_nodes: usize,
    /// Execution time in microseconds.
    pub execution_time_us: u64,
}

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Output schema.
    pub schema: Schema,
    /// Result rows, in iterator order.
    pub rows: Vec<Row>,
    /// Wall-clock time spent opening, draining and closing the iterator.
    pub elapsed: Duration,
    /// Execution metrics, when enabled in the config.
    pub metrics: Option<ExecutionMetrics>,
}

impl QueryResult {
    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pretty prints the result as a table.
    pub fn display(&self) -> String {
        let mut output = String::new();

        let fields = self.schema.fields();
        let mut col_widths: Vec<usize> = fields.iter().map(|f| f.name().len()).collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if i < col_widths.len() {
                    col_widths[i] = col_widths[i].max(cell.len());
                }
            }
        }

        // Header
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                output.push_str(" | ");
            }
            output.push_str(&format!("{:width$}", field.name(), width = col_widths[i]));
        }
        output.push('\n');

        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                output.push_str("-+-");
            }
            output.push_str(&"-".repeat(*width));
        }
        output.push('\n');

        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    output.push_str(" | ");
                }
                let width = col_widths.get(i).copied().unwrap_or(0);
                output.push_str(&format!("{:width$}", cell, width = width));
            }
            output.push('\n');
        }

        output.push_str(&format!("({} rows)\n", self.rows.len()));
        output
    }
}

/// Query executor that runs plan trees.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    ctx: ExecutionContext,
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(ctx: ExecutionContext) -> Self {
        Self { ctx }
    }

    /// Returns the execution context.
    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Executes a plan and returns all rows.
    ///
    /// The root iterator is closed whether or not draining succeeds. A
    /// draining error takes precedence over a close error.
    pub fn execute(&self, plan: &NodeRef) -> ExecResult<QueryResult> {
        if !plan.resolved() {
            return Err(ExecError::Unresolved(format!("plan {}", plan)));
        }

        let start = Instant::now();
        tracing::debug!("executing plan rooted at {}", plan.name());

        let mut iter = plan.row_iter(&self.ctx)?;
        let drained = drain(iter.as_mut());
        let closed = iter.close();

        let rows = match (drained, closed) {
            (Ok(rows), Ok(())) => rows,
            (Err(e), Ok(())) | (Ok(_), Err(e)) => return Err(e),
            (Err(e), Err(close_err)) => {
                tracing::warn!("failed to close plan after execution error: {}", close_err);
                return Err(e);
            }
        };

        let elapsed = start.elapsed();
        tracing::debug!(
            "plan {} returned {} rows in {:?}",
            plan.name(),
            rows.len(),
            elapsed
        );

        let metrics = self.ctx.config().collect_metrics.then(|| {
            let mut plan_nodes = 0;
            plan.for_each_up(&mut |_| plan_nodes += 1);
            ExecutionMetrics {
                rows_returned: rows.len(),
                plan_nodes,
                execution_time_us: elapsed.as_micros() as u64,
            }
        });

        Ok(QueryResult {
            schema: plan.schema(),
            rows,
            elapsed,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ExecutionConfig;
    use crate::plan::{CrossJoin, MemoryTable, UnresolvedTable};
    use crate::row;
    use crate::types::{DataType, Field};

    fn numbers(name: &str, n: i64) -> NodeRef {
        Arc::new(MemoryTable::new(
            name,
            Schema::new(vec![Field::not_null(name, DataType::Int64)]),
            (1..=n).map(|i| row![i]).collect(),
        ))
    }

    #[test]
    fn test_execute_cross_join() {
        let plan: NodeRef = Arc::new(CrossJoin::new(numbers("a", 3), numbers("b", 4)));
        let result = QueryExecutor::default().execute(&plan).unwrap();
        assert_eq!(result.len(), 12);
        assert_eq!(result.schema.len(), 2);
        assert!(result.metrics.is_none());
    }

    #[test]
    fn test_metrics() {
        let executor = QueryExecutor::new(ExecutionContext::new(ExecutionConfig::for_testing()));
        let plan: NodeRef = Arc::new(CrossJoin::new(numbers("a", 2), numbers("b", 2)));
        let metrics = executor.execute(&plan).unwrap().metrics.unwrap();
        assert_eq!(metrics.rows_returned, 4);
        assert_eq!(metrics.plan_nodes, 3);
    }

    #[test]
    fn test_unresolved_plan_rejected() {
        let plan: NodeRef = Arc::new(UnresolvedTable::new("t"));
        assert!(matches!(
            QueryExecutor::default().execute(&plan),
            Err(ExecError::Unresolved(_))
        ));
    }

    #[test]
    fn test_display() {
        let plan = numbers("n", 2);
        let result = QueryExecutor::default().execute(&plan).unwrap();
        assert_eq!(result.display(), "n\n-\n1\n2\n(2 rows)\n");
    }
}
