use ndarray::Array2;

use crate::error::PipelineError;
use crate::models::ModelState;

/// The contract the pipeline needs from a trainable classifier.
///
/// Centralizing it here keeps the concrete model technology swappable
/// without touching the preprocessing or prediction code.
pub trait Classifier {
    /// Fit the model on encoded labels in [0, n_classes).
    fn fit(&mut self, x: &Array2<f32>, y: &[usize], n_classes: usize)
        -> Result<(), PipelineError>;

    /// Per-class score vectors, one row per input row, n_classes columns.
    fn predict_scores(&self, x: &Array2<f32>) -> Array2<f32>;

    /// Serializable weights for persistence.
    fn state(&self) -> ModelState;

    /// Human readable name for the model.
    fn name(&self) -> &str {
        "classifier"
    }
}
