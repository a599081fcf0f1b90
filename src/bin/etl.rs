//! reservation-etl: one full Extract -> Transform -> Load run.
//!
//! Pulls full snapshots from the four operational databases, rebuilds the
//! warehouse fact and dimension tables, and writes a timestamped run log
//! alongside stdout output.
//!
//! ## Configuration
//! - `ETL_CONFIG`: path to a YAML configuration file
//! - `ETL__SOURCES__*` / `ETL__WAREHOUSE__*` / `ETL__STAGING__*`: section
//!   overrides, e.g. `ETL__WAREHOUSE__HOST`
//! - `ETL_LOG`: tracing filter (default `info`)

use std::fs;
use std::path::Path;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reservation_etl::config::{Config, LOG_ENV_VAR};
use reservation_etl::pipeline::run_pipeline;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None).map_err(|e| {
        eprintln!("failed to load configuration: {e}");
        e
    })?;

    fs::create_dir_all(&config.log.dir)?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_path = Path::new(&config.log.dir).join(format!("etl_{stamp}.log"));
    let log_file = fs::File::create(&log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .init();

    info!(log = %log_path.display(), "ETL process started");

    match run_pipeline(&config).await {
        Ok(report) => {
            if report.has_failures() {
                info!("ETL process completed with skipped tables; see run log");
            } else {
                info!("ETL process completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "ETL process failed");
            Err(e.into())
        }
    }
}
