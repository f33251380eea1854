//! Prediction-time re-application of the fitted scaling and encoding to new
//! raw rows. Pure functions of their inputs: no session state is touched.

use ndarray::Array2;

use crate::encoding::LabelEncoding;
use crate::error::PipelineError;
use crate::models::{argmax, Classifier};
use crate::preprocessing::ScalingParameters;

/// Parse a comma-separated prediction request into numeric values.
///
/// Whitespace around values is ignored. Fails with `Conversion` carrying the
/// first token that does not parse as a number.
pub fn parse_prediction_input(text: &str) -> Result<Vec<f32>, PipelineError> {
    text.split(',')
        .map(str::trim)
        .map(|token| {
            token.parse::<f32>().map_err(|_| PipelineError::Conversion {
                value: token.to_string(),
            })
        })
        .collect()
}

/// Predict the decoded class label for one raw feature row.
///
/// The row must supply one value per fitted feature column, in the column
/// order recorded by `params` (`InputShape` otherwise). The row is scaled
/// with the same parameters fit at training time, scored as a batch of one,
/// and the argmax class (ties to the lowest index) is decoded back to its
/// raw label value.
pub fn predict(
    raw_row: &[f32],
    model: &dyn Classifier,
    params: &ScalingParameters,
    encoding: &LabelEncoding,
) -> Result<String, PipelineError> {
    let scaled = params.transform_row(raw_row)?;

    let x = Array2::from_shape_vec((1, scaled.len()), scaled)
        .expect("single-row shape is consistent by construction");
    let scores = model.predict_scores(&x);

    let row: Vec<f32> = scores.row(0).to_vec();
    let class = argmax(&row);
    Ok(encoding.decode(class).to_string())
}
