//! Transformation stage: loaded datasets into the fact and dimension
//! datasets.
//!
//! Unlike Extract and Load, this stage is all-or-nothing: a missing or
//! unreadable input aborts it, since every downstream table depends on the
//! joined whole.

mod dims;
mod fact;

pub use dims::{build_dimensions, USER_COLUMNS};
pub use fact::{build_fact_table, FACT_COLUMNS};

use std::collections::HashMap;

use tracing::info;

use crate::frame::Frame;
use crate::staging::{Stage, StagingArea};

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors that abort the transformation stage.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("missing source dataset: {0}")]
    MissingDataset(String),

    #[error("staging error: {0}")]
    Staging(#[from] crate::staging::StagingError),

    #[error("frame error: {0}")]
    Frame(#[from] crate::frame::FrameError),
}

/// Name of the staged fact dataset.
pub const FACT_DATASET: &str = "fact_table";
/// Prefix for staged dimension datasets.
pub const DIM_PREFIX: &str = "dim_";

/// Transformation stage: consumes loaded datasets, stages the fact and
/// dimension datasets, and deletes the inputs it consumed.
pub struct Transformer<'a> {
    staging: &'a StagingArea,
}

impl<'a> Transformer<'a> {
    pub fn new(staging: &'a StagingArea) -> Self {
        Self { staging }
    }

    /// Build every transformed dataset from the given loaded datasets.
    ///
    /// On success the consumed loaded artifacts are deleted and the
    /// transformed dataset names returned, fact first.
    pub fn run(&self, datasets: &[String]) -> Result<Vec<String>> {
        info!("starting data transformation");

        let mut data = HashMap::new();
        for name in datasets {
            let frame = self.staging.read(name, Stage::Loaded)?;
            info!(dataset = %name, rows = frame.len(), "loaded staged dataset");
            data.insert(name.as_str(), frame);
        }

        let fact = build_fact_table(&data)?;
        let dims = build_dimensions(&data)?;

        let mut transformed = Vec::with_capacity(1 + dims.len());
        self.staging.write(FACT_DATASET, Stage::Transformed, &fact)?;
        info!(dataset = FACT_DATASET, rows = fact.len(), "fact dataset staged");
        transformed.push(FACT_DATASET.to_string());

        for (name, frame) in &dims {
            let staged = format!("{DIM_PREFIX}{name}");
            self.staging.write(&staged, Stage::Transformed, frame)?;
            info!(dataset = %staged, rows = frame.len(), "dimension dataset staged");
            transformed.push(staged);
        }

        for name in datasets {
            self.staging.delete(name, Stage::Loaded)?;
        }

        info!("data transformation complete");
        Ok(transformed)
    }
}

fn require<'d>(data: &'d HashMap<&str, Frame>, name: &str) -> Result<&'d Frame> {
    data.get(name)
        .ok_or_else(|| TransformError::MissingDataset(name.to_string()))
}
