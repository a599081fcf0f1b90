//! Pipeline configuration.
//!
//! Aggregates connection, staging and loader settings into a single Config
//! struct that can be loaded from a YAML file or environment variables and
//! is passed explicitly into each pipeline component.

mod databases;
mod run;

pub use databases::{SourceCredentials, WarehouseConfig};
pub use run::{LoaderConfig, LogConfig, StagingConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "etl.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "ETL_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "ETL";
/// Environment variable for the logging filter.
pub const LOG_ENV_VAR: &str = "ETL_LOG";

use serde::Deserialize;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Main pipeline configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credentials shared by the four operational source databases.
    pub sources: SourceCredentials,
    /// Warehouse connection settings.
    pub warehouse: WarehouseConfig,
    /// Staging area settings.
    pub staging: StagingConfig,
    /// Loader batching settings.
    pub loader: LoaderConfig,
    /// Run-log settings.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `etl.yaml` in the current directory (if it exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by the `ETL_CONFIG` environment variable (if set)
    /// 4. Environment variables with the `ETL` prefix, e.g.
    ///    `ETL__WAREHOUSE__HOST`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
