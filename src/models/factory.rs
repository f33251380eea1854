use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::Classifier;
use crate::models::mlp::SoftmaxMlp;
use crate::models::ModelState;

/// Build a boxed, unfitted classifier from a `ModelConfig`.
pub fn build_model(config: &ModelConfig) -> Box<dyn Classifier> {
    match config.model_type {
        ModelType::Mlp { .. } => Box::new(SoftmaxMlp::new(config)),
    }
}

/// Rebuild a fitted classifier from persisted weights.
pub fn restore_model(state: ModelState) -> Box<dyn Classifier> {
    match state {
        ModelState::Mlp(state) => Box::new(SoftmaxMlp::from_state(state)),
    }
}
