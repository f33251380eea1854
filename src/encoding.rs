//! Label-to-index encoding, assigned in first-seen order.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A stable mapping from raw label values to dense class indices in [0, K).
///
/// Indices are assigned in first-seen order during a single pass over the
/// training label column and never re-ordered within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoding {
    classes: Vec<String>,
}

impl LabelEncoding {
    /// Build the mapping from a label column and encode it in the same pass.
    pub fn fit(labels: &[String]) -> (Self, Vec<usize>) {
        let mut classes: Vec<String> = Vec::new();
        let mut codes = Vec::with_capacity(labels.len());

        for label in labels {
            let code = match classes.iter().position(|c| c == label) {
                Some(code) => code,
                None => {
                    classes.push(label.clone());
                    classes.len() - 1
                }
            };
            codes.push(code);
        }

        log::debug!("label encoding fit over {} class(es)", classes.len());
        (LabelEncoding { classes }, codes)
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Look up the class index for a raw label value.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Encode a sequence of raw labels.
    ///
    /// Fails with `Conversion` on a label absent from the fitted mapping.
    pub fn encode_all(&self, labels: &[String]) -> Result<Vec<usize>, PipelineError> {
        labels
            .iter()
            .map(|label| {
                self.encode(label).ok_or_else(|| PipelineError::Conversion {
                    value: label.clone(),
                })
            })
            .collect()
    }

    /// Decode a class index back to its raw label value.
    ///
    /// An out-of-range index is a contract violation — decode only ever
    /// receives indices produced by a classifier whose output space is K —
    /// so it panics rather than returning a recoverable error.
    pub fn decode(&self, class_index: usize) -> &str {
        assert!(
            class_index < self.classes.len(),
            "class index {} out of range for {} classes",
            class_index,
            self.classes.len()
        );
        &self.classes[class_index]
    }
}
