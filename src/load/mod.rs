//! Load stage: transformed datasets into the warehouse.

use sea_query::{Alias, ColumnDef, MysqlQueryBuilder, Query, Table};
use sqlx::mysql::MySqlPool;
use tracing::{error, info};

use crate::config::{LoaderConfig, WarehouseConfig};
use crate::frame::{Frame, Value};
use crate::pipeline::StageReport;
use crate::staging::{Stage, StagingArea};
use crate::transform::{DIM_PREFIX, FACT_DATASET};

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while loading warehouse tables.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("warehouse error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("staging error: {0}")]
    Staging(#[from] crate::staging::StagingError),
}

/// Physical warehouse table for a transformed dataset name.
pub fn target_table(dataset: &str) -> &str {
    if dataset == FACT_DATASET {
        "mst_reservation"
    } else {
        dataset.strip_prefix(DIM_PREFIX).unwrap_or(dataset)
    }
}

/// Load stage: writes every transformed dataset to its warehouse table,
/// replacing prior contents, then clears the transformed staging
/// artifacts.
pub struct Loader<'a> {
    warehouse: &'a WarehouseConfig,
    batch_size: usize,
    staging: &'a StagingArea,
}

impl<'a> Loader<'a> {
    pub fn new(
        warehouse: &'a WarehouseConfig,
        loader: &LoaderConfig,
        staging: &'a StagingArea,
    ) -> Self {
        Self {
            warehouse,
            batch_size: loader.batch_size.max(1),
            staging,
        }
    }

    /// Write the given transformed datasets to the warehouse over one
    /// connection.
    ///
    /// A failed table write is recorded and the remaining tables are still
    /// attempted. Every transformed artifact is deleted afterwards,
    /// including those whose write failed - a load failure is therefore not
    /// retryable from staging.
    pub async fn run(&self, datasets: &[String]) -> Result<StageReport> {
        info!("starting data load");
        let mut report = StageReport::new("load");

        let pool = MySqlPool::connect(&self.warehouse.url()).await?;
        let mut conn = pool.acquire().await?;

        for dataset in datasets {
            let table = target_table(dataset);
            match self.load_table(&mut conn, dataset, table).await {
                Ok(rows) => {
                    info!(dataset = %dataset, table, rows, "loaded warehouse table");
                    report.succeeded(dataset);
                }
                Err(e) => {
                    error!(
                        dataset = %dataset,
                        table,
                        error = %e,
                        "failed to load warehouse table"
                    );
                    report.failed(dataset, e.to_string());
                }
            }
        }

        drop(conn);
        pool.close().await;

        // Cleanup runs regardless of per-table failures.
        for dataset in datasets {
            self.staging.delete(dataset, Stage::Transformed)?;
        }

        info!("data load complete");
        Ok(report)
    }

    async fn load_table(
        &self,
        conn: &mut sqlx::pool::PoolConnection<sqlx::MySql>,
        dataset: &str,
        table: &str,
    ) -> Result<u64> {
        let frame = self.staging.read(dataset, Stage::Transformed)?;

        let drop_sql = Table::drop()
            .table(Alias::new(table))
            .if_exists()
            .to_string(MysqlQueryBuilder);
        sqlx::query(&drop_sql).execute(&mut **conn).await?;

        let create_sql = create_table_sql(table, &frame);
        sqlx::query(&create_sql).execute(&mut **conn).await?;

        let mut written = 0u64;
        for chunk in frame.rows().chunks(self.batch_size) {
            let mut insert = Query::insert();
            insert
                .into_table(Alias::new(table))
                .columns(frame.columns().iter().map(|c| Alias::new(c.as_str())));
            for row in chunk {
                insert.values_panic(row.iter().map(sea_value));
            }
            let sql = insert.to_string(MysqlQueryBuilder);
            written += sqlx::query(&sql).execute(&mut **conn).await?.rows_affected();
        }
        Ok(written)
    }
}

/// DDL for a replacement table, column types inferred from the frame.
///
/// All-integer columns become BIGINT, numeric columns DOUBLE, everything
/// else TEXT; every column accepts nulls.
fn create_table_sql(table: &str, frame: &Frame) -> String {
    let mut create = Table::create();
    create.table(Alias::new(table));
    for (index, name) in frame.columns().iter().enumerate() {
        let mut column = ColumnDef::new(Alias::new(name.as_str()));
        match infer_column_type(frame, index) {
            ColumnType::Integer => column.big_integer(),
            ColumnType::Double => column.double(),
            ColumnType::Text => column.text(),
        };
        create.col(&mut column);
    }
    create.to_string(MysqlQueryBuilder)
}

enum ColumnType {
    Integer,
    Double,
    Text,
}

fn infer_column_type(frame: &Frame, index: usize) -> ColumnType {
    let mut any_float = false;
    let mut any_number = false;
    for row in frame.rows() {
        match &row[index] {
            Value::Null => {}
            Value::Int(_) => any_number = true,
            Value::Float(_) => {
                any_number = true;
                any_float = true;
            }
            Value::Text(_) => return ColumnType::Text,
        }
    }
    if !any_number {
        ColumnType::Text
    } else if any_float {
        ColumnType::Double
    } else {
        ColumnType::Integer
    }
}

fn sea_value(value: &Value) -> sea_query::SimpleExpr {
    match value {
        Value::Null => sea_query::Value::String(None).into(),
        Value::Int(i) => (*i).into(),
        Value::Float(f) => (*f).into(),
        Value::Text(s) => s.clone().into(),
    }
}
