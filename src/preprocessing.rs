//! Per-column feature scaling fit once from training data and re-applied,
//! unchanged, to every later input — including single prediction-time rows.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::{ColumnData, TabularDataset};
use crate::error::PipelineError;

/// Which scaling formula to apply.
///
/// `MinMax` maps each value to `(v - min) / (max - min)`. `RangeRatio` is
/// `v / (max - min)`, kept for behavioral parity with deployments that were
/// fit with that formula; it does not map onto [0, 1] unless min is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    MinMax,
    RangeRatio,
}

impl Default for ScalingMode {
    fn default() -> Self {
        ScalingMode::MinMax
    }
}

/// Fitted per-column (min, max) pairs plus the column order they were fit in.
///
/// Immutable once fit. The recorded column order is the contract for every
/// later transform: a prediction row must supply one value per column, in
/// this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    columns: Vec<String>,
    min: Vec<f32>,
    max: Vec<f32>,
    mode: ScalingMode,
}

impl ScalingParameters {
    /// Fit min/max per feature column.
    ///
    /// Fails with `Conversion` if a retained column is categorical.
    pub fn fit(features: &TabularDataset, mode: ScalingMode) -> Result<Self, PipelineError> {
        assert!(features.n_rows() > 0, "cannot fit scaler on an empty table");

        let mut columns = Vec::with_capacity(features.n_cols());
        let mut min = Vec::with_capacity(features.n_cols());
        let mut max = Vec::with_capacity(features.n_cols());

        for column in features.columns() {
            let values = match &column.data {
                ColumnData::Numeric(values) => values,
                ColumnData::Categorical(values) => {
                    let value = values.first().cloned().unwrap_or_default();
                    return Err(PipelineError::Conversion { value });
                }
            };

            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for &v in values {
                lo = lo.min(v);
                hi = hi.max(v);
            }

            columns.push(column.name.clone());
            min.push(lo as f32);
            max.push(hi as f32);
        }

        log::debug!("fit scaler over {} column(s), mode {:?}", columns.len(), mode);
        Ok(ScalingParameters { columns, min, max, mode })
    }

    /// Number of feature columns the parameters were fit on.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Feature column names, in the order prediction rows must follow.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn mode(&self) -> ScalingMode {
        self.mode
    }

    pub fn min(&self) -> &[f32] {
        &self.min
    }

    pub fn max(&self) -> &[f32] {
        &self.max
    }

    /// Scale one value by its column's fitted parameters.
    ///
    /// A constant column (max == min) maps every value to 0.0 under both
    /// modes; the division is undefined there and 0.0 is the documented
    /// convention.
    fn scale(&self, col: usize, value: f32) -> f32 {
        let range = self.max[col] - self.min[col];
        if range == 0.0 {
            return 0.0;
        }
        match self.mode {
            ScalingMode::MinMax => (value - self.min[col]) / range,
            ScalingMode::RangeRatio => value / range,
        }
    }

    /// Transform a full matrix whose columns match the fitted column order.
    pub fn transform_matrix(&self, x: &Array2<f32>) -> Array2<f32> {
        assert_eq!(
            x.ncols(),
            self.len(),
            "matrix column count does not match fitted parameters"
        );

        let mut out = x.clone();
        for ((_, col), v) in out.indexed_iter_mut() {
            *v = self.scale(col, *v);
        }
        out
    }

    /// Transform a single raw row, validating its length first.
    pub fn transform_row(&self, row: &[f32]) -> Result<Vec<f32>, PipelineError> {
        if row.len() != self.len() {
            return Err(PipelineError::InputShape {
                expected: self.len(),
                got: row.len(),
            });
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(col, &v)| self.scale(col, v))
            .collect())
    }
}
