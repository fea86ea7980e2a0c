//! Execution context and runtime configuration.
//!
//! The execution context carries runtime configuration into every
//! `Node::row_iter` call. Configuration can be built in code or loaded from
//! a TOML file.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this structure.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting has an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum number of rows a join may hold in memory for its replayed
    /// side. `None` means unbounded.
    #[serde(default)]
    pub max_buffered_rows: Option<usize>,

    /// Whether to collect execution metrics.
    #[serde(default)]
    pub collect_metrics: bool,
}

impl ExecutionConfig {
    /// Creates a config suited to tests: small buffers, metrics on.
    pub fn for_testing() -> Self {
        Self {
            max_buffered_rows: Some(10_000),
            collect_metrics: true,
        }
    }

    /// Sets the buffered row cap.
    pub fn with_max_buffered_rows(mut self, rows: usize) -> Self {
        self.max_buffered_rows = Some(rows);
        self
    }

    /// Parses configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_buffered_rows == Some(0) {
            return Err(ConfigError::Invalid(
                "max_buffered_rows must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runtime context handed to plan nodes when they open row iterators.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    config: Arc<ExecutionConfig>,
}

impl ExecutionContext {
    /// Creates a new execution context.
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the execution configuration.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }
}
