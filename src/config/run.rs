//! Staging, loader and run-log settings.

use serde::Deserialize;

/// Staging area settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Directory holding staged datasets between stages.
    pub root: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            root: "./staging-area".to_string(),
        }
    }
}

/// Loader batching settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Rows per INSERT statement when writing warehouse tables.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

/// Run-log settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory receiving timestamped run logs.
    pub dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: "./logs".to_string(),
        }
    }
}
