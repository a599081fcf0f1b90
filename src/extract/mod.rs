//! Extraction stage: operational databases into loaded staging artifacts.

use rust_decimal::prelude::ToPrimitive;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{error, info};

use crate::catalog::{SourceDatabase, SOURCE_DATABASES};
use crate::config::SourceCredentials;
use crate::frame::{Frame, Value};
use crate::pipeline::StageReport;
use crate::staging::{Stage, StagingArea};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting one table.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("staging error: {0}")]
    Staging(#[from] crate::staging::StagingError),

    #[error("frame error: {0}")]
    Frame(#[from] crate::frame::FrameError),
}

/// Extraction stage: runs the fixed catalog queries against each source
/// database and persists every result as a loaded dataset.
pub struct Extractor<'a> {
    credentials: &'a SourceCredentials,
    staging: &'a StagingArea,
}

impl<'a> Extractor<'a> {
    pub fn new(credentials: &'a SourceCredentials, staging: &'a StagingArea) -> Self {
        Self {
            credentials,
            staging,
        }
    }

    /// Extract every catalog table, one database at a time.
    ///
    /// A connection failure skips that database's tables; a query failure
    /// skips that table. Both are recorded in the report instead of
    /// aborting the batch.
    pub async fn run(&self) -> StageReport {
        info!("starting data extraction");
        let mut report = StageReport::new("extract");
        for source in SOURCE_DATABASES {
            self.extract_database(source, &mut report).await;
        }
        info!("data extraction complete");
        report
    }

    async fn extract_database(&self, source: &SourceDatabase, report: &mut StageReport) {
        info!(database = source.name, "connecting to source database");
        let pool = match MySqlPool::connect(&self.credentials.url(source.name)).await {
            Ok(pool) => pool,
            Err(e) => {
                error!(
                    database = source.name,
                    error = %e,
                    "source connection failed; skipping database"
                );
                for table in source.tables {
                    report.failed(
                        table.dataset,
                        format!("connection to {} failed: {e}", source.name),
                    );
                }
                return;
            }
        };

        for table in source.tables {
            match self.extract_table(&pool, table.query, table.dataset).await {
                Ok(rows) => {
                    info!(dataset = table.dataset, rows, "extracted and staged");
                    report.succeeded(table.dataset);
                }
                Err(e) => {
                    error!(
                        dataset = table.dataset,
                        database = source.name,
                        error = %e,
                        "extraction failed; skipping table"
                    );
                    report.failed(table.dataset, e.to_string());
                }
            }
        }

        // Connections are not held across the run.
        pool.close().await;
    }

    async fn extract_table(&self, pool: &MySqlPool, query: &str, dataset: &str) -> Result<usize> {
        let rows = sqlx::query(query).fetch_all(pool).await?;
        let frame = rows_to_frame(&rows)?;
        self.staging.write(dataset, Stage::Loaded, &frame)?;
        Ok(frame.len())
    }
}

fn rows_to_frame(rows: &[MySqlRow]) -> Result<Frame> {
    let Some(first) = rows.first() else {
        return Ok(Frame::new(Vec::new()));
    };

    let columns = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let mut frame = Frame::new(columns);
    for row in rows {
        let mut cells = Vec::with_capacity(row.len());
        for (index, column) in row.columns().iter().enumerate() {
            cells.push(decode_cell(row, index, column.type_info().name())?);
        }
        frame.push_row(cells)?;
    }
    Ok(frame)
}

/// Decode one result cell into a [`Value`], driven by the MySQL column type.
///
/// Integer families land as `Int`, float/double/decimal as `Float`, date and
/// time types as text in `%Y-%m-%d [%H:%M:%S]` form, everything else as
/// text.
fn decode_cell(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let name = type_name.to_ascii_uppercase();
    let value = if name == "BOOLEAN" {
        Value::Int(row.try_get::<bool, _>(index)? as i64)
    } else if name.contains("INT") || name == "YEAR" {
        if name.contains("UNSIGNED") {
            Value::Int(row.try_get::<u64, _>(index)? as i64)
        } else {
            Value::Int(row.try_get::<i64, _>(index)?)
        }
    } else if name == "FLOAT" {
        Value::Float(row.try_get::<f32, _>(index)? as f64)
    } else if name == "DOUBLE" {
        Value::Float(row.try_get::<f64, _>(index)?)
    } else if name.contains("DECIMAL") {
        let decimal: rust_decimal::Decimal = row.try_get(index)?;
        decimal.to_f64().map(Value::Float).unwrap_or(Value::Null)
    } else if name == "DATE" {
        let date: chrono::NaiveDate = row.try_get(index)?;
        Value::Text(date.format("%Y-%m-%d").to_string())
    } else if name == "DATETIME" {
        let datetime: chrono::NaiveDateTime = row.try_get(index)?;
        Value::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
    } else if name == "TIMESTAMP" {
        let datetime: chrono::DateTime<chrono::Utc> = row.try_get(index)?;
        Value::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
    } else {
        Value::Text(row.try_get::<String, _>(index)?)
    };
    Ok(value)
}
