//! In-memory representation of an uploaded table.
//!
//! A `TabularDataset` holds named columns of equal length. It is produced
//! once per upload, mutated only by column removal, and consumed when the
//! label column is split off. All validation happens before any mutation so
//! a failed call leaves the dataset unchanged.

use ndarray::Array2;

use crate::error::PipelineError;

/// Values of a single column, typed at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Render every cell as text, preserving categorical cells verbatim.
    /// Used to feed the label encoder, which keys on raw values.
    pub fn values_as_text(&self) -> Vec<String> {
        match &self.data {
            ColumnData::Numeric(values) => values.iter().map(|v| v.to_string()).collect(),
            ColumnData::Categorical(values) => values.clone(),
        }
    }
}

/// An ordered set of named columns with a fixed row count.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl TabularDataset {
    /// Build a dataset from columns, verifying equal lengths and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self, PipelineError> {
        if columns.is_empty() {
            return Err(PipelineError::Parse("table has no columns".to_string()));
        }

        let n_rows = columns[0].data.len();
        for column in &columns {
            if column.data.len() != n_rows {
                return Err(PipelineError::Parse(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.data.len(),
                    n_rows
                )));
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(PipelineError::Parse(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(TabularDataset { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Remove the named columns, atomically.
    ///
    /// Every requested name is verified before any column is dropped; on the
    /// first missing name the dataset is left byte-for-byte unchanged and
    /// that name is reported. An empty request list is a no-op.
    pub fn remove_columns(&mut self, names: &[String]) -> Result<(), PipelineError> {
        for name in names {
            if self.column(name).is_none() {
                return Err(PipelineError::ColumnNotFound(name.clone()));
            }
        }

        self.columns.retain(|c| !names.contains(&c.name));
        log::debug!(
            "removed {} column(s), {} retained",
            names.len(),
            self.columns.len()
        );
        Ok(())
    }

    /// Split off the label column, consuming the dataset.
    ///
    /// Returns the remaining feature columns and the label column itself.
    pub fn split_label(mut self, label_name: &str) -> Result<(TabularDataset, Column), PipelineError> {
        let Some(idx) = self.columns.iter().position(|c| c.name == label_name) else {
            return Err(PipelineError::ColumnNotFound(label_name.to_string()));
        };

        let label = self.columns.remove(idx);
        Ok((self, label))
    }

    /// Materialize the columns as a row-major feature matrix.
    ///
    /// Fails with `Conversion` on the first categorical cell encountered;
    /// feature columns must be numeric.
    pub fn to_matrix(&self) -> Result<Array2<f32>, PipelineError> {
        let n_cols = self.columns.len();
        let mut data = vec![0.0f32; self.n_rows * n_cols];

        for (j, column) in self.columns.iter().enumerate() {
            match &column.data {
                ColumnData::Numeric(values) => {
                    for (i, &v) in values.iter().enumerate() {
                        data[i * n_cols + j] = v as f32;
                    }
                }
                ColumnData::Categorical(values) => {
                    let value = values.first().cloned().unwrap_or_default();
                    return Err(PipelineError::Conversion { value });
                }
            }
        }

        Array2::from_shape_vec((self.n_rows, n_cols), data)
            .map_err(|e| PipelineError::Parse(e.to_string()))
    }
}
