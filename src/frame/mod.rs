//! In-memory tabular datasets.
//!
//! A [`Frame`] is a schema-on-read table: ordered column names plus rows of
//! dynamically typed [`Value`] cells. The transform stage is built entirely
//! from the operations defined here - left joins with collision suffixing,
//! exact-duplicate removal, column projection and in-place column rewrites.

mod value;

pub use value::Value;

use std::collections::{HashMap, HashSet};

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors that can occur while reshaping frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("row width mismatch: expected {expected} cells, got {actual}")]
    RowWidth { expected: usize, actual: usize },
}

/// A named-column table of [`Value`] cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Create an empty frame with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(FrameError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    /// Left-join `right` onto this frame.
    ///
    /// Every row of this frame appears in the output. Right-side columns
    /// whose name collides with a left column are renamed with `suffix`;
    /// when both keys share one name the right key column is merged away
    /// and only the left copy remains. A left row with no match null-fills
    /// the right columns; multiple matches fan out, one output row per
    /// match. Null keys never match.
    pub fn left_join(
        &self,
        right: &Frame,
        left_key: &str,
        right_key: &str,
        suffix: &str,
    ) -> Result<Frame> {
        let left_idx = self.column_index(left_key)?;
        let right_idx = right.column_index(right_key)?;
        let merge_key = left_key == right_key;

        let mut columns = self.columns.clone();
        // Right column positions carried into the output, in order.
        let mut carried: Vec<usize> = Vec::with_capacity(right.columns.len());
        for (i, name) in right.columns.iter().enumerate() {
            if merge_key && i == right_idx {
                continue;
            }
            carried.push(i);
            if self.columns.iter().any(|c| c == name) {
                columns.push(format!("{name}{suffix}"));
            } else {
                columns.push(name.clone());
            }
        }

        let mut by_key: HashMap<&Value, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            let key = &row[right_idx];
            if !key.is_null() {
                by_key.entry(key).or_default().push(i);
            }
        }

        let mut joined = Frame::new(columns);
        for row in &self.rows {
            match by_key.get(&row[left_idx]) {
                Some(matches) => {
                    for &ri in matches {
                        let mut cells = row.clone();
                        for &ci in &carried {
                            cells.push(right.rows[ri][ci].clone());
                        }
                        joined.rows.push(cells);
                    }
                }
                None => {
                    let mut cells = row.clone();
                    cells.extend(carried.iter().map(|_| Value::Null));
                    joined.rows.push(cells);
                }
            }
        }
        Ok(joined)
    }

    /// Remove exact-duplicate rows, keeping the first occurrence.
    pub fn dedup(&self) -> Frame {
        let mut seen: HashSet<&Vec<Value>> = HashSet::with_capacity(self.rows.len());
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if seen.insert(row) {
                rows.push(row.clone());
            }
        }
        Frame {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Project to the given columns, in the given order.
    pub fn select(&self, wanted: &[&str]) -> Result<Frame> {
        let indices = wanted
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Frame {
            columns: wanted.iter().map(|s| s.to_string()).collect(),
            rows,
        })
    }

    /// Rewrite a column in place.
    pub fn apply<F>(&mut self, column: &str, f: F) -> Result<()>
    where
        F: Fn(&Value) -> Value,
    {
        let idx = self.column_index(column)?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        Ok(())
    }
}
