//! # nexus-exec
//!
//! Expression evaluation and plan-node execution core for NexusDB.
//!
//! This crate implements:
//! - A closed value domain and the type system that coerces between types
//! - Scalar expression trees and the built-in scalar functions
//! - Bottom-up, non-mutating rewriting of expression and plan trees
//! - Relational plan nodes with pull-based row iterators
//!
//! Parsing, catalog access and rule selection live elsewhere; this crate only
//! provides the primitives a planner invokes.
//!
//! # Example
//!
//! ```ignore
//! use nexus_exec::plan::{CrossJoin, MemoryTable};
//! use nexus_exec::{ExecutionContext, QueryExecutor};
//!
//! let join = Arc::new(CrossJoin::new(left, right));
//! let result = QueryExecutor::new(ExecutionContext::default()).execute(&join)?;
//! assert_eq!(result.rows.len(), left_rows * right_rows);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Configuration and execution context.
pub mod config;

/// Error types.
pub mod error;

/// Query executor.
pub mod executor;

/// Scalar expressions.
pub mod expression;

/// Built-in scalar functions and their registry.
pub mod function;

/// Relational plan nodes and row iterators.
pub mod plan;

/// Rows flowing between iterators.
pub mod row;

/// Tree rewriting shared by expressions and plans.
pub mod tree;

/// Values, data types and schemas.
pub mod types;

pub use config::{ConfigError, ExecutionConfig, ExecutionContext};
pub use error::{ConversionError, ExecError, ExecResult};
pub use executor::{ExecutionMetrics, QueryExecutor, QueryResult};
pub use expression::{ExprRef, Expression};
pub use plan::{Node, NodeRef, RowIter};
pub use row::Row;
pub use tree::TreeNode;
pub use types::{Column, DataType, Field, Schema, Value};
