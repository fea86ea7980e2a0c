//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nexus_exec::plan::{MemoryTable, Node, NodeRef, RowIter};
use nexus_exec::{DataType, ExecError, ExecResult, ExecutionContext, Field, Row, Schema};
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Single text column table.
pub fn text_table(name: &str, column: &str, values: &[&str]) -> NodeRef {
    Arc::new(MemoryTable::new(
        name,
        Schema::new(vec![Field::not_null(column, DataType::Text)]),
        values.iter().map(|v| nexus_exec::row![*v]).collect(),
    ))
}

/// Counters shared between a mock iterator and the test that owns it.
#[derive(Debug, Default)]
pub struct Probe {
    pub pulls: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Row iterator with scripted rows and failures.
#[derive(Debug)]
pub struct MockIter {
    rows: VecDeque<Row>,
    fail_next_at: Option<usize>,
    close_error: Option<String>,
    probe: Arc<Probe>,
}

impl MockIter {
    pub fn new(rows: Vec<Row>, probe: Arc<Probe>) -> Self {
        Self {
            rows: rows.into(),
            fail_next_at: None,
            close_error: None,
            probe,
        }
    }

    /// Fails the pull with this zero-based index.
    pub fn failing_next_at(mut self, pull: usize) -> Self {
        self.fail_next_at = Some(pull);
        self
    }

    pub fn failing_close(mut self, message: &str) -> Self {
        self.close_error = Some(message.to_string());
        self
    }

    pub fn boxed(self) -> Box<dyn RowIter> {
        Box::new(self)
    }
}

impl RowIter for MockIter {
    fn next_row(&mut self) -> ExecResult<Option<Row>> {
        let pull = self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_at == Some(pull) {
            return Err(ExecError::Iterator(format!("pull {} failed", pull)));
        }
        Ok(self.rows.pop_front())
    }

    fn close(&mut self) -> ExecResult<()> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        match &self.close_error {
            Some(message) => Err(ExecError::Iterator(message.clone())),
            None => Ok(()),
        }
    }
}

/// Leaf node that either opens a [`MockIter`] or fails to open.
#[derive(Debug, Clone)]
pub struct MockNode {
    pub schema: Schema,
    pub rows: Vec<Row>,
    pub fail_open: bool,
    pub close_error: Option<String>,
    pub probe: Arc<Probe>,
}

impl MockNode {
    pub fn new(rows: Vec<Row>, probe: Arc<Probe>) -> Self {
        Self {
            schema: Schema::new(vec![Field::nullable("mock", DataType::Text)]),
            rows,
            fail_open: false,
            close_error: None,
            probe,
        }
    }
}

impl Node for MockNode {
    fn name(&self) -> &str {
        "Mock"
    }

    fn schema(&self) -> Schema {
        self.schema.clone()
    }

    fn children(&self) -> Vec<NodeRef> {
        Vec::new()
    }

    fn with_new_children(&self, _children: Vec<NodeRef>) -> ExecResult<NodeRef> {
        Ok(Arc::new(self.clone()))
    }

    fn row_iter(&self, _ctx: &ExecutionContext) -> ExecResult<Box<dyn RowIter>> {
        if self.fail_open {
            return Err(ExecError::Iterator("open failed".to_string()));
        }
        let mut iter = MockIter::new(self.rows.clone(), self.probe.clone());
        if let Some(message) = &self.close_error {
            iter = iter.failing_close(message);
        }
        Ok(iter.boxed())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for MockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mock")
    }
}
