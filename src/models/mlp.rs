//! Softmax multi-layer perceptron: one SELU hidden layer with dropout and a
//! K-way softmax output, trained with sparse categorical cross-entropy.

use ndarray::{Array1, Array2, Axis, Zip};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use statrs::distribution::Normal;

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::models::{Classifier, ModelState};

const SELU_SCALE: f32 = 1.050_700_9;
const SELU_ALPHA: f32 = 1.673_263_2;

/// Trained weights, serializable for artifact bundling.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MlpState {
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
}

/// MLP classifier over the crate's `Classifier` contract.
pub struct SoftmaxMlp {
    hidden_width: usize,
    dropout: f32,
    learning_rate: f32,
    epochs: usize,
    batch_size: usize,
    validation_split: f32,
    optimizer: String,
    loss: String,
    seed: u64,
    state: Option<MlpState>,
}

enum OptimKind {
    Adam,
    Sgd,
}

impl SoftmaxMlp {
    pub fn new(config: &ModelConfig) -> Self {
        let ModelType::Mlp {
            hidden_width,
            dropout,
        } = config.model_type;

        SoftmaxMlp {
            hidden_width,
            dropout,
            learning_rate: config.learning_rate,
            epochs: config.epochs,
            batch_size: config.batch_size,
            validation_split: config.validation_split,
            optimizer: config.optimizer.clone(),
            loss: config.loss.clone(),
            seed: config.seed,
            state: None,
        }
    }

    /// Rebuild an inference-only model from persisted weights.
    pub fn from_state(state: MlpState) -> Self {
        let mut model = SoftmaxMlp::new(&ModelConfig::default());
        model.state = Some(state);
        model
    }

    fn resolve_optimizer(&self) -> Result<OptimKind, PipelineError> {
        match self.optimizer.as_str() {
            "adam" => Ok(OptimKind::Adam),
            "sgd" => Ok(OptimKind::Sgd),
            other => Err(PipelineError::Config(format!(
                "unrecognized optimizer '{}' (recognized: adam, sgd)",
                other
            ))),
        }
    }

    fn forward(state: &MlpState, x: &Array2<f32>) -> Array2<f32> {
        let z1 = x.dot(&state.w1) + &state.b1;
        let h = selu(&z1);
        let logits = h.dot(&state.w2) + &state.b2;
        softmax_rows(logits)
    }

    fn mean_loss(state: &MlpState, x: &Array2<f32>, y: &[usize]) -> f32 {
        let probs = Self::forward(state, x);
        cross_entropy(&probs, y)
    }
}

impl Classifier for SoftmaxMlp {
    fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &[usize],
        n_classes: usize,
    ) -> Result<(), PipelineError> {
        assert_eq!(x.nrows(), y.len(), "feature rows and labels must align");
        assert!(x.nrows() > 0, "cannot fit on an empty matrix");
        assert!(x.ncols() > 0, "cannot fit on zero feature columns");
        assert!(self.batch_size > 0, "batch size must be positive");
        assert!(
            y.iter().all(|&c| c < n_classes),
            "label code out of range for {} classes",
            n_classes
        );

        if self.loss != "sparse_categorical_crossentropy" {
            return Err(PipelineError::Config(format!(
                "unrecognized loss '{}' (recognized: sparse_categorical_crossentropy)",
                self.loss
            )));
        }
        let optimizer = self.resolve_optimizer()?;

        let n = x.nrows();
        let d = x.ncols();
        let h = self.hidden_width;
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Hold out a validation fraction for per-epoch loss reporting.
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        let n_val = ((n as f32 * self.validation_split).round() as usize).min(n - 1);
        let (val_rows, train_rows) = order.split_at(n_val);

        let xt = x.select(Axis(0), train_rows);
        let yt: Vec<usize> = train_rows.iter().map(|&i| y[i]).collect();
        let xv = x.select(Axis(0), val_rows);
        let yv: Vec<usize> = val_rows.iter().map(|&i| y[i]).collect();

        // LeCun normal init.
        let mut state = MlpState {
            w1: init_normal((d, h), d, &mut rng)?,
            b1: Array1::zeros(h),
            w2: init_normal((h, n_classes), h, &mut rng)?,
            b2: Array1::zeros(n_classes),
        };

        let mut opt = AdamBuffers::like(&state);
        let mut step = 0i32;

        for epoch in 0..self.epochs {
            let mut batch_order: Vec<usize> = (0..xt.nrows()).collect();
            batch_order.shuffle(&mut rng);

            let mut epoch_loss = 0.0f32;
            let mut n_batches = 0usize;

            for batch in batch_order.chunks(self.batch_size) {
                let xb = xt.select(Axis(0), batch);
                let yb: Vec<usize> = batch.iter().map(|&i| yt[i]).collect();
                let b = xb.nrows() as f32;

                // Forward pass, dropout applied to the hidden activations.
                let z1 = xb.dot(&state.w1) + &state.b1;
                let mut hidden = selu(&z1);
                let mask = dropout_mask(hidden.dim(), self.dropout, &mut rng);
                if let Some(mask) = &mask {
                    hidden = hidden * mask;
                }
                let logits = hidden.dot(&state.w2) + &state.b2;
                let probs = softmax_rows(logits);

                epoch_loss += cross_entropy(&probs, &yb);
                n_batches += 1;

                // Backward pass.
                let mut dlogits = probs;
                for (i, &class) in yb.iter().enumerate() {
                    dlogits[(i, class)] -= 1.0;
                }
                dlogits.mapv_inplace(|v| v / b);

                let dw2 = hidden.t().dot(&dlogits);
                let db2 = dlogits.sum_axis(Axis(0));

                let mut dhidden = dlogits.dot(&state.w2.t());
                if let Some(mask) = &mask {
                    dhidden = dhidden * mask;
                }
                let dz1 = dhidden * selu_grad(&z1);

                let dw1 = xb.t().dot(&dz1);
                let db1 = dz1.sum_axis(Axis(0));

                step += 1;
                match optimizer {
                    OptimKind::Adam => {
                        adam_step(&mut state.w1, &dw1, &mut opt.m_w1, &mut opt.v_w1, step, self.learning_rate);
                        adam_step(&mut state.b1, &db1, &mut opt.m_b1, &mut opt.v_b1, step, self.learning_rate);
                        adam_step(&mut state.w2, &dw2, &mut opt.m_w2, &mut opt.v_w2, step, self.learning_rate);
                        adam_step(&mut state.b2, &db2, &mut opt.m_b2, &mut opt.v_b2, step, self.learning_rate);
                    }
                    OptimKind::Sgd => {
                        sgd_step(&mut state.w1, &dw1, self.learning_rate);
                        sgd_step(&mut state.b1, &db1, self.learning_rate);
                        sgd_step(&mut state.w2, &dw2, self.learning_rate);
                        sgd_step(&mut state.b2, &db2, self.learning_rate);
                    }
                }
            }

            let train_loss = epoch_loss / n_batches.max(1) as f32;
            if xv.nrows() > 0 {
                let val_loss = Self::mean_loss(&state, &xv, &yv);
                log::debug!(
                    "epoch {}/{}: loss {:.4}, val_loss {:.4}",
                    epoch + 1,
                    self.epochs,
                    train_loss,
                    val_loss
                );
            } else {
                log::debug!(
                    "epoch {}/{}: loss {:.4}",
                    epoch + 1,
                    self.epochs,
                    train_loss
                );
            }
        }

        self.state = Some(state);
        Ok(())
    }

    fn predict_scores(&self, x: &Array2<f32>) -> Array2<f32> {
        let state = self.state.as_ref().expect("model has not been fitted");
        Self::forward(state, x)
    }

    fn state(&self) -> ModelState {
        ModelState::Mlp(
            self.state
                .as_ref()
                .expect("model has not been fitted")
                .clone(),
        )
    }

    fn name(&self) -> &str {
        "softmax-mlp"
    }
}

fn selu(z: &Array2<f32>) -> Array2<f32> {
    z.mapv(|v| {
        if v > 0.0 {
            SELU_SCALE * v
        } else {
            SELU_SCALE * SELU_ALPHA * (v.exp() - 1.0)
        }
    })
}

fn selu_grad(z: &Array2<f32>) -> Array2<f32> {
    z.mapv(|v| {
        if v > 0.0 {
            SELU_SCALE
        } else {
            SELU_SCALE * SELU_ALPHA * v.exp()
        }
    })
}

/// Row-wise softmax with the usual max-shift for numerical stability.
fn softmax_rows(mut logits: Array2<f32>) -> Array2<f32> {
    for mut row in logits.axis_iter_mut(Axis(0)) {
        let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum: f32 = row.iter().sum();
        row.mapv_inplace(|v| v / sum);
    }
    logits
}

fn cross_entropy(probs: &Array2<f32>, y: &[usize]) -> f32 {
    let mut loss = 0.0f32;
    for (i, &class) in y.iter().enumerate() {
        loss -= (probs[(i, class)] + 1e-12).ln();
    }
    loss / y.len().max(1) as f32
}

fn init_normal(
    shape: (usize, usize),
    fan_in: usize,
    rng: &mut StdRng,
) -> Result<Array2<f32>, PipelineError> {
    assert!(fan_in > 0, "fan-in must be positive");
    let std = 1.0 / (fan_in as f64).sqrt();
    let normal =
        Normal::new(0.0, std).map_err(|e| PipelineError::Config(e.to_string()))?;
    Ok(Array2::from_shape_fn(shape, |_| normal.sample(rng) as f32))
}

/// Inverted dropout mask: kept units are scaled by 1/(1-p) so inference
/// needs no rescaling.
fn dropout_mask(
    dim: (usize, usize),
    dropout: f32,
    rng: &mut StdRng,
) -> Option<Array2<f32>> {
    if dropout <= 0.0 {
        return None;
    }
    let keep_scale = 1.0 / (1.0 - dropout);
    Some(Array2::from_shape_fn(dim, |_| {
        if rng.gen::<f32>() < dropout {
            0.0
        } else {
            keep_scale
        }
    }))
}

struct AdamBuffers {
    m_w1: Array2<f32>,
    v_w1: Array2<f32>,
    m_b1: Array1<f32>,
    v_b1: Array1<f32>,
    m_w2: Array2<f32>,
    v_w2: Array2<f32>,
    m_b2: Array1<f32>,
    v_b2: Array1<f32>,
}

impl AdamBuffers {
    fn like(state: &MlpState) -> Self {
        AdamBuffers {
            m_w1: Array2::zeros(state.w1.dim()),
            v_w1: Array2::zeros(state.w1.dim()),
            m_b1: Array1::zeros(state.b1.len()),
            v_b1: Array1::zeros(state.b1.len()),
            m_w2: Array2::zeros(state.w2.dim()),
            v_w2: Array2::zeros(state.w2.dim()),
            m_b2: Array1::zeros(state.b2.len()),
            v_b2: Array1::zeros(state.b2.len()),
        }
    }
}

fn adam_step<D: ndarray::Dimension>(
    param: &mut ndarray::Array<f32, D>,
    grad: &ndarray::Array<f32, D>,
    m: &mut ndarray::Array<f32, D>,
    v: &mut ndarray::Array<f32, D>,
    step: i32,
    learning_rate: f32,
) {
    const BETA1: f32 = 0.9;
    const BETA2: f32 = 0.999;
    const EPS: f32 = 1e-7;

    m.zip_mut_with(grad, |m, &g| *m = BETA1 * *m + (1.0 - BETA1) * g);
    v.zip_mut_with(grad, |v, &g| *v = BETA2 * *v + (1.0 - BETA2) * g * g);

    let correction1 = 1.0 - BETA1.powi(step);
    let correction2 = 1.0 - BETA2.powi(step);

    Zip::from(param).and(&*m).and(&*v).for_each(|p, &m, &v| {
        let m_hat = m / correction1;
        let v_hat = v / correction2;
        *p -= learning_rate * m_hat / (v_hat.sqrt() + EPS);
    });
}

fn sgd_step<D: ndarray::Dimension>(
    param: &mut ndarray::Array<f32, D>,
    grad: &ndarray::Array<f32, D>,
    learning_rate: f32,
) {
    param.zip_mut_with(grad, |p, &g| *p -= learning_rate * g);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_rows_sum_to_one() {
        let logits = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, -1.0, 0.0, 1.0]).unwrap();
        let probs = softmax_rows(logits);
        for row in probs.axis_iter(Axis(0)) {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "row sum = {}", sum);
            for &p in row.iter() {
                assert!(p > 0.0 && p < 1.0);
            }
        }
    }

    #[test]
    fn selu_positive_is_linear() {
        let z = Array2::from_shape_vec((1, 2), vec![1.0, 2.0]).unwrap();
        let out = selu(&z);
        assert!((out[(0, 0)] - SELU_SCALE).abs() < 1e-5);
        assert!((out[(0, 1)] - 2.0 * SELU_SCALE).abs() < 1e-5);
    }

    #[test]
    fn fit_produces_finite_scores() {
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                0.0, 0.0, 0.1, 0.0, 0.0, 0.1, 0.1, 0.1, 1.0, 1.0, 0.9, 1.0, 1.0, 0.9, 0.9, 0.9,
            ],
        )
        .unwrap();
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];

        let mut config = ModelConfig::default();
        config.epochs = 4;
        config.model_type = ModelType::Mlp {
            hidden_width: 8,
            dropout: 0.0,
        };
        let mut model = SoftmaxMlp::new(&config);
        model.fit(&x, &y, 2).unwrap();

        let scores = model.predict_scores(&x);
        assert_eq!(scores.dim(), (8, 2));
        for &s in scores.iter() {
            assert!(s.is_finite());
        }
    }

    #[test]
    fn unrecognized_optimizer_is_rejected() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 0.1, 0.9, 1.0]).unwrap();
        let y = vec![0, 0, 1, 1];

        let mut config = ModelConfig::default();
        config.optimizer = "rmsprop".to_string();
        let mut model = SoftmaxMlp::new(&config);
        let err = model.fit(&x, &y, 2).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
