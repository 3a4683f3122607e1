//! Optional TOML settings for the `mazegen` binary. Command-line flags take
//! precedence over anything loaded here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mazegen_core::{Algorithm, GenerationOptions};
use mazegen_core::session::{DEFAULT_COLUMNS, DEFAULT_ROWS};
use serde::Deserialize;

use crate::logging::DEFAULT_FILTER;

/// TOML schema for the tool config file.
///
/// ```toml
/// rows = 21
/// columns = 31
/// algorithm = "aldous-broder"
/// log_filter = "mazegen_core=debug"
///
/// [generation]
/// aldous_broder_step_cap = 200000
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub seed: Option<u64>,
    pub algorithm: Option<Algorithm>,
    pub log_filter: Option<String>,
    #[serde(default)]
    pub generation: GenerationOptions,
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn rows_or_default(&self) -> usize {
        self.rows.unwrap_or(DEFAULT_ROWS)
    }

    pub fn columns_or_default(&self) -> usize {
        self.columns.unwrap_or(DEFAULT_COLUMNS)
    }

    pub fn algorithm_or_default(&self) -> Algorithm {
        self.algorithm.unwrap_or(Algorithm::RecursiveBacktracker)
    }

    pub fn log_filter_or_default(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_FILTER)
    }
}
