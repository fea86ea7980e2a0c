//! Scalar expressions.
//!
//! An expression is a node in a scalar computation tree that is evaluated
//! once per row. Variants are independent types behind the [`Expression`]
//! trait and are shared through [`ExprRef`] handles; rewriting goes through
//! [`TreeNode::transform_up`](crate::tree::TreeNode::transform_up) and
//! always produces new nodes.
//!
//! # Example
//!
//! ```ignore
//! use nexus_exec::expression::{GetField, Literal};
//! use nexus_exec::function::Substring;
//!
//! let expr = Substring::new(vec![
//!     GetField::new(0, "name", DataType::Text, true).into_ref(),
//!     Literal::new(Value::bigint(2)).into_ref(),
//! ])?;
//! let value = expr.eval(&row)?;
//! ```

mod column;
mod literal;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use column::*;
pub use literal::*;

use crate::error::{ExecError, ExecResult};
use crate::row::Row;
use crate::tree::TreeNode;
use crate::types::{DataType, Value};

/// A shared handle to an expression node.
pub type ExprRef = Arc<dyn Expression>;

/// Contract shared by every expression variant.
pub trait Expression: fmt::Debug + fmt::Display + Send + Sync {
    /// Stable, human-readable identifier. Used for display only.
    fn name(&self) -> &str;

    /// Static result type. Never depends on a row.
    fn data_type(&self) -> DataType;

    /// True if evaluation against some legal row can yield NULL.
    fn is_nullable(&self) -> bool;

    /// True once every reference inside this subtree is bound.
    fn resolved(&self) -> bool {
        self.children().iter().all(|child| child.resolved())
    }

    /// Direct children, in argument order.
    fn children(&self) -> Vec<ExprRef>;

    /// Rebuilds this expression, same variant, with new children.
    fn with_new_children(&self, children: Vec<ExprRef>) -> ExecResult<ExprRef>;

    /// Evaluates this expression against a row.
    fn eval(&self, row: &Row) -> ExecResult<Value>;

    /// Returns self as `Any` for downcasting in rewrite functions.
    fn as_any(&self) -> &dyn Any;
}

impl TreeNode for ExprRef {
    fn tree_children(&self) -> Vec<Self> {
        self.children()
    }

    fn with_tree_children(&self, children: Vec<Self>) -> ExecResult<Self> {
        self.with_new_children(children)
    }
}

/// Returns true if both trees have the same variants, the same rendering
/// and the same children, recursively. Instances may differ.
pub fn same_shape(a: &ExprRef, b: &ExprRef) -> bool {
    if a.name() != b.name() || a.to_string() != b.to_string() {
        return false;
    }
    let (left, right) = (a.children(), b.children());
    left.len() == right.len() && left.iter().zip(&right).all(|(l, r)| same_shape(l, r))
}

/// Extracts the single child of a unary expression.
pub(crate) fn unary_child(name: &str, mut children: Vec<ExprRef>) -> ExecResult<ExprRef> {
    match children.len() {
        1 => Ok(children.remove(0)),
        n => Err(ExecError::arity(name, "1", n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(index: usize, name: &str) -> ExprRef {
        Arc::new(GetField::new(index, name, DataType::Int64, true))
    }

    #[test]
    fn test_unary_child_arity() {
        assert!(unary_child("f", vec![col(0, "a")]).is_ok());
        let err = unary_child("f", vec![col(0, "a"), col(1, "b")]).unwrap_err();
        assert!(matches!(err, ExecError::Arity { actual: 2, .. }));
    }

    #[test]
    fn test_same_shape() {
        assert!(same_shape(&col(0, "a"), &col(0, "a")));
        assert!(!same_shape(&col(0, "a"), &col(1, "b")));
        assert!(!same_shape(&col(0, "a"), &Literal::new(Value::bigint(0)).into_ref()));
    }

    #[test]
    fn test_transform_up_on_leaf_calls_f_once() {
        let leaf = col(0, "a");
        let mut calls = 0;
        let out = leaf
            .transform_up(&mut |e: ExprRef| {
                calls += 1;
                Ok(e)
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&leaf, &out));
    }
}
