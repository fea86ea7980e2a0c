//! Built-in scalar functions and their registry.
//!
//! Each function lives in its own file and exposes a `register` hook that
//! adds its builder to a [`FunctionRegistry`]. Builders validate arity when
//! the expression is constructed, so a mis-called function fails before any
//! row is processed.

mod is_binary;
mod substring;
mod year;

use std::collections::HashMap;
use std::fmt;

pub use is_binary::{IsBinary, SNIFF_LEN};
pub use substring::Substring;
pub use year::Year;

use crate::error::{ExecError, ExecResult};
use crate::expression::ExprRef;

/// Builds a function expression from its arguments.
pub type FunctionBuilder = fn(Vec<ExprRef>) -> ExecResult<ExprRef>;

/// Name to builder lookup for scalar functions.
///
/// Names are case-insensitive.
pub struct FunctionRegistry {
    builders: HashMap<String, FunctionBuilder>,
}

impl FunctionRegistry {
    /// Creates a registry with every built-in function.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        is_binary::register(&mut registry);
        substring::register(&mut registry);
        year::register(&mut registry);

        registry
    }

    /// Creates a registry with no functions.
    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registers a builder, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, builder: FunctionBuilder) {
        self.builders.insert(name.to_lowercase(), builder);
    }

    /// Returns true if a function named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(&name.to_lowercase())
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds the function `name` over `args`.
    pub fn build(&self, name: &str, args: Vec<ExprRef>) -> ExecResult<ExprRef> {
        let builder = self
            .builders
            .get(&name.to_lowercase())
            .ok_or_else(|| ExecError::UnknownFunction(name.to_string()))?;
        builder(args)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Writes `name(arg1, arg2, ...)`.
pub(crate) fn fmt_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[ExprRef]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ")")
}
