//! Pipeline orchestration and per-dataset outcome bookkeeping.

use tracing::{error, info};

use crate::config::Config;
use crate::extract::Extractor;
use crate::load::Loader;
use crate::staging::StagingArea;
use crate::transform::Transformer;

/// Result type for a full pipeline run.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Top-level pipeline failure.
///
/// Extract and Load tolerate per-dataset failures and never surface here;
/// Transform is all-or-nothing and aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("transform stage failed: {0}")]
    Transform(#[from] crate::transform::TransformError),

    #[error("load stage failed: {0}")]
    Load(#[from] crate::load::LoadError),
}

/// Outcome of one dataset within a best-effort stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded { dataset: String },
    Failed { dataset: String, reason: String },
}

/// Per-dataset results of a best-effort stage.
///
/// Extract and Load never abort their batch: each dataset either succeeds
/// or is recorded here with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct StageReport {
    stage: &'static str,
    outcomes: Vec<ItemOutcome>,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            outcomes: Vec::new(),
        }
    }

    pub fn succeeded(&mut self, dataset: &str) {
        self.outcomes.push(ItemOutcome::Succeeded {
            dataset: dataset.to_string(),
        });
    }

    pub fn failed(&mut self, dataset: &str, reason: impl Into<String>) {
        self.outcomes.push(ItemOutcome::Failed {
            dataset: dataset.to_string(),
            reason: reason.into(),
        });
    }

    pub fn stage(&self) -> &str {
        self.stage
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    /// Datasets that made it through the stage, in recorded order.
    pub fn successes(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Succeeded { dataset } => Some(dataset.clone()),
                ItemOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Skipped datasets with the reason each was skipped.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Failed { dataset, reason } => {
                    Some((dataset.as_str(), reason.as_str()))
                }
                ItemOutcome::Succeeded { .. } => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, ItemOutcome::Failed { .. }))
    }
}

/// Run the full pipeline: Extract, then Transform, then Load.
///
/// Returns the load-stage report on success.
pub async fn run_pipeline(config: &Config) -> Result<StageReport> {
    let staging = StagingArea::new(config.staging.root.as_str());

    info!("extract stage starting");
    let extractor = Extractor::new(&config.sources, &staging);
    let extract_report = extractor.run().await;
    for (dataset, reason) in extract_report.failures() {
        error!(dataset, reason, "dataset skipped during extraction");
    }
    let staged = extract_report.successes();
    info!(staged = staged.len(), "extract stage complete");

    info!("transform stage starting");
    let transformer = Transformer::new(&staging);
    let transformed = transformer.run(&staged)?;
    info!(datasets = transformed.len(), "transform stage complete");

    info!("load stage starting");
    let loader = Loader::new(&config.warehouse, &config.loader, &staging);
    let load_report = loader.run(&transformed).await?;
    for (dataset, reason) in load_report.failures() {
        error!(dataset, reason, "table skipped during load");
    }
    info!("load stage complete");

    Ok(load_report)
}
