use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for trainable models.
///
/// Hyperparameters are configuration with recognized options and fixed
/// defaults; nothing here is derived from data shape beyond the input/output
/// dimensionality passed at training time.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of the training rows held out for per-epoch validation loss.
    pub validation_split: f32,
    /// Recognized options: "adam", "sgd".
    pub optimizer: String,
    /// Recognized options: "sparse_categorical_crossentropy".
    pub loss: String,
    /// Seed for weight init, dropout masks, and batch shuffling.
    pub seed: u64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyperparameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    Mlp { hidden_width: usize, dropout: f32 },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Mlp {
            hidden_width: 256,
            dropout: 0.15,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mlp" => Ok(ModelType::default()),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
            ..Self::default()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            epochs: 16,
            batch_size: 32,
            validation_split: 0.15,
            optimizer: "adam".to_string(),
            loss: "sparse_categorical_crossentropy".to_string(),
            seed: 42,
            model_type: ModelType::default(),
        }
    }
}
