//! Relational plan nodes and row iterators.
//!
//! A plan is a tree of [`Node`]s. Executing a node opens a [`RowIter`], a
//! pull-based cursor that produces one row per call and must be closed
//! exactly once when the caller is done with it. Composite nodes open their
//! children's iterators and are responsible for closing them.

mod cross_join;
mod filter;
mod memory;
mod project;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use cross_join::{CrossJoin, CrossJoinIter};
pub use filter::Filter;
pub use memory::{MemoryTable, UnresolvedTable};
pub use project::Project;

use crate::config::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::expression::ExprRef;
use crate::row::Row;
use crate::tree::TreeNode;
use crate::types::Schema;

/// A shared handle to a plan node.
pub type NodeRef = Arc<dyn Node>;

/// Pull-based cursor over a node's output rows.
pub trait RowIter: fmt::Debug {
    /// Returns the next row, or `None` once the stream is exhausted.
    fn next_row(&mut self) -> ExecResult<Option<Row>>;

    /// Releases the iterator and everything it opened.
    fn close(&mut self) -> ExecResult<()>;
}

/// Contract shared by every plan node.
pub trait Node: fmt::Debug + fmt::Display + Send + Sync {
    /// Node name, used for display.
    fn name(&self) -> &str;

    /// Output schema.
    fn schema(&self) -> Schema;

    /// True iff this node, its descendants and every embedded expression
    /// are bound.
    fn resolved(&self) -> bool {
        self.children().iter().all(|child| child.resolved())
            && self.expressions().iter().all(|expr| expr.resolved())
    }

    /// Child nodes, in order.
    fn children(&self) -> Vec<NodeRef>;

    /// Rebuilds this node, same variant, with new children.
    fn with_new_children(&self, children: Vec<NodeRef>) -> ExecResult<NodeRef>;

    /// Expressions embedded in this node.
    fn expressions(&self) -> Vec<ExprRef> {
        Vec::new()
    }

    /// Rebuilds this node with new embedded expressions.
    ///
    /// Nodes without expressions accept only an empty list.
    fn with_new_expressions(&self, exprs: Vec<ExprRef>) -> ExecResult<NodeRef> {
        if !exprs.is_empty() {
            return Err(ExecError::arity(self.name(), "0", exprs.len()));
        }
        self.with_new_children(self.children())
    }

    /// Opens a row iterator over this node's output.
    fn row_iter(&self, ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>>;

    /// Returns self as `Any` for downcasting in rewrite functions.
    fn as_any(&self) -> &dyn Any;
}

impl TreeNode for NodeRef {
    fn tree_children(&self) -> Vec<Self> {
        self.children()
    }

    fn with_tree_children(&self, children: Vec<Self>) -> ExecResult<Self> {
        self.with_new_children(children)
    }
}

/// Rewrites every expression embedded in the plan bottom-up, leaving the
/// plan structure unchanged.
pub fn transform_expressions_up<F>(node: &NodeRef, f: &mut F) -> ExecResult<NodeRef>
where
    F: FnMut(ExprRef) -> ExecResult<ExprRef>,
{
    node.transform_up(&mut |n: NodeRef| {
        let exprs = n.expressions();
        if exprs.is_empty() {
            return Ok(n);
        }
        let rewritten = exprs
            .iter()
            .map(|expr| expr.transform_up(f))
            .collect::<ExecResult<Vec<_>>>()?;
        n.with_new_expressions(rewritten)
    })
}

/// Fails with [`ExecError::Unresolved`] unless `node` is resolved.
pub fn ensure_resolved(node: &dyn Node) -> ExecResult<()> {
    if node.resolved() {
        Ok(())
    } else {
        Err(ExecError::Unresolved(format!("plan node {}", node)))
    }
}

/// Pulls every remaining row out of `iter`. Does not close it.
pub fn drain(iter: &mut dyn RowIter) -> ExecResult<Vec<Row>> {
    let mut rows = Vec::new();
    while let Some(row) = iter.next_row()? {
        rows.push(row);
    }
    Ok(rows)
}

/// Returns an indented, one-node-per-line rendering of the plan.
pub fn display_plan(node: &NodeRef) -> String {
    let mut output = String::new();
    format_node(node, 0, &mut output);
    output
}

fn format_node(node: &NodeRef, indent: usize, output: &mut String) {
    let prefix = "  ".repeat(indent);
    output.push_str(&format!("{}{}\n", prefix, node));
    for child in node.children() {
        format_node(&child, indent + 1, output);
    }
}

/// Extracts the single child of a unary node.
pub(crate) fn unary_child(name: &str, mut children: Vec<NodeRef>) -> ExecResult<NodeRef> {
    match children.len() {
        1 => Ok(children.remove(0)),
        n => Err(ExecError::arity(name, "1", n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Expression, GetField, Literal, UnresolvedColumn};
    use crate::function::Substring;
    use crate::row;
    use crate::types::{DataType, Field, Value};

    fn people() -> NodeRef {
        Arc::new(MemoryTable::new(
            "people",
            Schema::new(vec![
                Field::not_null("id", DataType::Int64),
                Field::nullable("name", DataType::Text),
            ]),
            vec![row![1i64, "alice"], row![2i64, "bob"]],
        ))
    }

    fn unresolved_projection() -> NodeRef {
        let substr = Substring::new(vec![
            UnresolvedColumn::new("name").into_ref(),
            Literal::new(1i64).into_ref(),
            Literal::new(2i64).into_ref(),
        ])
        .unwrap();
        Arc::new(Project::new(vec![Arc::new(substr) as ExprRef], people()))
    }

    #[test]
    fn test_transform_expressions_up_resolves_columns() {
        let plan = unresolved_projection();
        assert!(!plan.resolved());
        assert!(plan.row_iter(&ExecutionContext::default()).is_err());

        let schema = people().schema();
        let resolved = transform_expressions_up(&plan, &mut |e: ExprRef| {
            if let Some(col) = e.as_any().downcast_ref::<UnresolvedColumn>() {
                if let Some(bound) = GetField::bind(&schema, col.name()) {
                    return Ok(Arc::new(bound) as ExprRef);
                }
            }
            Ok(e)
        })
        .unwrap();

        assert!(resolved.resolved());
        assert_eq!(resolved.children().len(), 1);
        assert_eq!(resolved.name(), "Project");

        let mut iter = resolved.row_iter(&ExecutionContext::default()).unwrap();
        let rows = drain(iter.as_mut()).unwrap();
        iter.close().unwrap();
        assert_eq!(rows, vec![row!["al"], row!["bo"]]);
    }

    #[test]
    fn test_transform_up_identity_keeps_shape() {
        let plan: NodeRef = Arc::new(CrossJoin::new(people(), unresolved_projection()));
        let rewritten = plan.transform_up(&mut |n: NodeRef| Ok(n)).unwrap();
        assert_eq!(display_plan(&plan), display_plan(&rewritten));
        assert_eq!(rewritten.schema(), plan.schema());
    }

    #[test]
    fn test_transform_up_visits_post_order() {
        let plan: NodeRef = Arc::new(CrossJoin::new(people(), unresolved_projection()));
        let mut visited = Vec::new();
        plan.transform_up(&mut |n: NodeRef| {
            visited.push(n.name().to_string());
            Ok(n)
        })
        .unwrap();
        assert_eq!(visited, vec!["people", "people", "Project", "CrossJoin"]);
    }

    #[test]
    fn test_display_plan() {
        let plan: NodeRef = Arc::new(CrossJoin::new(people(), people()));
        assert_eq!(
            display_plan(&plan),
            "CrossJoin\n  MemoryTable: people\n  MemoryTable: people\n"
        );
    }

    #[test]
    fn test_leaf_rejects_expressions() {
        let table = people();
        assert!(table.with_new_expressions(vec![]).is_ok());
        assert!(table
            .with_new_expressions(vec![Literal::new(Value::bigint(1)).into_ref()])
            .is_err());
    }
}
