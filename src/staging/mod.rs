//! Filesystem staging area shared by the pipeline stages.
//!
//! Datasets are persisted as CSV artifacts addressed by `(name, stage)`.
//! The extractor writes `loaded` artifacts, the transformer consumes them
//! and writes `transformed` artifacts, the loader consumes those. At most
//! one artifact exists per address; writing replaces any prior artifact.

use std::fs;
use std::path::{Path, PathBuf};

use crate::frame::{Frame, Value};

/// Result type for staging operations.
pub type Result<T> = std::result::Result<T, StagingError>;

/// Errors that can occur while reading or writing staged artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("staging I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed staging artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("staging artifact shape error in {path}: {source}")]
    Shape {
        path: PathBuf,
        #[source]
        source: crate::frame::FrameError,
    },

    #[error("staging artifact not found: {path}")]
    NotFound { path: PathBuf },
}

/// Dataset lifecycle stage, half of the artifact address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Transformed,
}

impl Stage {
    fn suffix(self) -> &'static str {
        match self {
            Stage::Loaded => "loaded",
            Stage::Transformed => "transformed",
        }
    }
}

/// Shared staging directory holding datasets between pipeline stages.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the artifact for a `(name, stage)` address.
    pub fn path(&self, name: &str, stage: Stage) -> PathBuf {
        self.root.join(format!("{}_{}.csv", name, stage.suffix()))
    }

    pub fn exists(&self, name: &str, stage: Stage) -> bool {
        self.path(name, stage).exists()
    }

    /// Persist a frame, replacing any prior artifact at the same address.
    pub fn write(&self, name: &str, stage: Stage, frame: &Frame) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| StagingError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let path = self.path(name, stage);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| malformed(&path, e))?;
        if !frame.columns().is_empty() {
            writer
                .write_record(frame.columns())
                .map_err(|e| malformed(&path, e))?;
            for row in frame.rows() {
                writer
                    .write_record(row.iter().map(Value::to_string))
                    .map_err(|e| malformed(&path, e))?;
            }
        }
        writer.flush().map_err(|e| StagingError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Read an artifact back into a frame, inferring cell types per field.
    pub fn read(&self, name: &str, stage: Stage) -> Result<Frame> {
        let path = self.path(name, stage);
        if !path.exists() {
            return Err(StagingError::NotFound { path });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| malformed(&path, e))?;
        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| malformed(&path, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut frame = Frame::new(columns);
        for record in reader.records() {
            let record = record.map_err(|e| malformed(&path, e))?;
            frame
                .push_row(record.iter().map(Value::infer).collect())
                .map_err(|e| StagingError::Shape {
                    path: path.clone(),
                    source: e,
                })?;
        }
        Ok(frame)
    }

    /// Remove an artifact. Removing an absent artifact is not an error, so
    /// cleanup passes can re-run safely.
    pub fn delete(&self, name: &str, stage: Stage) -> Result<()> {
        let path = self.path(name, stage);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StagingError::Io { path, source: e }),
        }
    }
}

fn malformed(path: &Path, source: csv::Error) -> StagingError {
    StagingError::Malformed {
        path: path.to_path_buf(),
        source,
    }
}
