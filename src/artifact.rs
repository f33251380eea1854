//! Versioned persistence bundle.
//!
//! Scaling parameters, label encoding, and model weights are only ever
//! persisted together so a restore always yields a self-consistent triple.
//! Partial or mismatched payloads are fatal `Artifact` errors.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoding::LabelEncoding;
use crate::error::PipelineError;
use crate::models::ModelState;
use crate::preprocessing::ScalingParameters;

pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub scaling: ScalingParameters,
    pub encoding: LabelEncoding,
    pub model: ModelState,
    pub accuracy: Option<f32>,
}

impl ModelArtifact {
    pub fn new(
        scaling: ScalingParameters,
        encoding: LabelEncoding,
        model: ModelState,
        accuracy: Option<f32>,
    ) -> Self {
        ModelArtifact {
            version: ARTIFACT_VERSION,
            scaling,
            encoding,
            model,
            accuracy,
        }
    }

    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string(self).map_err(|e| PipelineError::Artifact(e.to_string()))
    }

    /// Parse and integrity-check a persisted artifact.
    pub fn from_json(text: &str) -> Result<Self, PipelineError> {
        let artifact: ModelArtifact =
            serde_json::from_str(text).map_err(|e| PipelineError::Artifact(e.to_string()))?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(PipelineError::Artifact(format!(
                "unsupported artifact version {} (expected {})",
                artifact.version, ARTIFACT_VERSION
            )));
        }
        Ok(artifact)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let json = self.to_json()?;
        fs::write(&path, json).map_err(|e| {
            PipelineError::Artifact(format!(
                "failed to write {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        log::info!("wrote model artifact to {}", path.as_ref().display());
        Ok(())
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(&path).map_err(|e| {
            PipelineError::Artifact(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&text)
    }
}
