//! Training orchestration and the caller-owned pipeline session.
//!
//! Every fitted object (scaler, encoding, model) lives inside an explicit
//! session value passed by the caller — never ambient state — so concurrent
//! sessions simply hold independent instances.

use ndarray::Array2;

use crate::artifact::ModelArtifact;
use crate::config::ModelConfig;
use crate::dataset::TabularDataset;
use crate::encoding::LabelEncoding;
use crate::error::PipelineError;
use crate::models::factory::{build_model, restore_model};
use crate::models::{argmax, Classifier};
use crate::pipeline;
use crate::preprocessing::{ScalingMode, ScalingParameters};
use crate::split::{stratified_split, SplitConfig};

/// A trained classifier plus its cached evaluation accuracy.
pub struct TrainingSession {
    model: Box<dyn Classifier>,
    accuracy: Option<f32>,
}

impl TrainingSession {
    /// Construct and fit a classifier with `feature_count`-dimensional input
    /// and `class_count`-way output.
    pub fn train(
        config: &ModelConfig,
        train_x: &Array2<f32>,
        train_y: &[usize],
        feature_count: usize,
        class_count: usize,
    ) -> Result<Self, PipelineError> {
        if train_x.ncols() != feature_count {
            return Err(PipelineError::InputShape {
                expected: feature_count,
                got: train_x.ncols(),
            });
        }

        let mut model = build_model(config);
        model.fit(train_x, train_y, class_count)?;
        log::info!(
            "trained {} on {} rows x {} features, {} classes",
            model.name(),
            train_x.nrows(),
            feature_count,
            class_count
        );

        Ok(TrainingSession {
            model,
            accuracy: None,
        })
    }

    /// Rebuild a session around an already-fitted model (restore path).
    pub fn from_parts(model: Box<dyn Classifier>, accuracy: Option<f32>) -> Self {
        TrainingSession { model, accuracy }
    }

    /// Evaluate on a held-out set and cache the resulting accuracy.
    pub fn evaluate(
        &mut self,
        test_x: &Array2<f32>,
        test_y: &[usize],
    ) -> Result<f32, PipelineError> {
        let accuracy = evaluate_model(self.model.as_ref(), test_x, test_y)?;
        self.accuracy = Some(accuracy);
        Ok(accuracy)
    }

    pub fn accuracy(&self) -> Option<f32> {
        self.accuracy
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}

impl std::fmt::Debug for TrainingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingSession")
            .field("model", &self.model.name())
            .field("accuracy", &self.accuracy)
            .finish()
    }
}

/// Accuracy as a percentage in [0, 100]: predicted class is the argmax of
/// each score row (ties to the lowest index).
///
/// Fails with `EmptyTestSet` on zero test rows.
pub fn evaluate_model(
    model: &dyn Classifier,
    test_x: &Array2<f32>,
    test_y: &[usize],
) -> Result<f32, PipelineError> {
    if test_x.nrows() == 0 {
        return Err(PipelineError::EmptyTestSet);
    }
    assert_eq!(test_x.nrows(), test_y.len(), "test rows and labels must align");

    let scores = model.predict_scores(test_x);
    let mut errors = 0usize;
    for (i, &actual) in test_y.iter().enumerate() {
        let row: Vec<f32> = scores.row(i).to_vec();
        if argmax(&row) != actual {
            errors += 1;
        }
    }

    let total = test_y.len() as f32;
    Ok(100.0 * (1.0 - errors as f32 / total))
}

/// The full fitted pipeline: scaling parameters, label encoding, and the
/// trained classifier, bound one-to-one.
pub struct PipelineSession {
    scaling: ScalingParameters,
    encoding: LabelEncoding,
    session: TrainingSession,
}

impl PipelineSession {
    /// Run the whole training flow on an already-pruned dataset: split off
    /// the label, fit scaler and encoder, stratify, train, evaluate.
    pub fn fit(
        dataset: TabularDataset,
        label_column: &str,
        config: &ModelConfig,
        split_config: &SplitConfig,
        mode: ScalingMode,
    ) -> Result<Self, PipelineError> {
        let (features, label) = dataset.split_label(label_column)?;

        let scaling = ScalingParameters::fit(&features, mode)?;
        let raw = features.to_matrix()?;
        let scaled = scaling.transform_matrix(&raw);

        let label_values = label.values_as_text();
        let (encoding, codes) = LabelEncoding::fit(&label_values);

        let split = stratified_split(&scaled, &codes, split_config)
            .map_err(|e| name_insufficient_class(e, &encoding))?;

        let mut session = TrainingSession::train(
            config,
            &split.train_x,
            &split.train_y,
            scaling.len(),
            encoding.n_classes(),
        )?;
        let accuracy = session.evaluate(&split.test_x, &split.test_y)?;
        log::info!("evaluation accuracy: {:.2}%", accuracy);

        Ok(PipelineSession {
            scaling,
            encoding,
            session,
        })
    }

    pub fn accuracy(&self) -> Option<f32> {
        self.session.accuracy()
    }

    pub fn scaling(&self) -> &ScalingParameters {
        &self.scaling
    }

    pub fn encoding(&self) -> &LabelEncoding {
        &self.encoding
    }

    pub fn model(&self) -> &dyn Classifier {
        self.session.model()
    }

    /// Predict the decoded label for one raw feature row.
    pub fn predict(&self, raw_row: &[f32]) -> Result<String, PipelineError> {
        pipeline::predict(raw_row, self.session.model(), &self.scaling, &self.encoding)
    }

    /// Predict from a comma-separated request string.
    pub fn predict_request(&self, text: &str) -> Result<String, PipelineError> {
        let row = pipeline::parse_prediction_input(text)?;
        self.predict(&row)
    }

    /// Bundle the fitted triple into one versioned artifact.
    pub fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact::new(
            self.scaling.clone(),
            self.encoding.clone(),
            self.session.model().state(),
            self.session.accuracy(),
        )
    }

    /// Restore a self-consistent session from a persisted artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        let ModelArtifact {
            scaling,
            encoding,
            model,
            accuracy,
            ..
        } = artifact;

        PipelineSession {
            scaling,
            encoding,
            session: TrainingSession::from_parts(restore_model(model), accuracy),
        }
    }
}

impl std::fmt::Debug for PipelineSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineSession")
            .field("scaling", &self.scaling)
            .field("encoding", &self.encoding)
            .field("session", &self.session)
            .finish()
    }
}

/// The split layer only sees encoded classes; report the human label.
fn name_insufficient_class(error: PipelineError, encoding: &LabelEncoding) -> PipelineError {
    match error {
        PipelineError::InsufficientData { class, count } => {
            let name = class
                .parse::<usize>()
                .ok()
                .filter(|&idx| idx < encoding.n_classes())
                .map(|idx| encoding.decode(idx).to_string())
                .unwrap_or(class);
            PipelineError::InsufficientData { class: name, count }
        }
        other => other,
    }
}
