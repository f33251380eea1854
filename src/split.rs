//! Stratified train/test partitioning with a fixed, configurable seed.

use std::collections::BTreeMap;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::PipelineError;

/// Split configuration: held-out fraction and shuffle seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub test_fraction: f32,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            test_fraction: 0.15,
            seed: 5,
        }
    }
}

/// The two disjoint partitions produced by a stratified split.
///
/// `train_indices` and `test_indices` reference rows of the input matrix and
/// together partition it exactly.
#[derive(Debug, Clone)]
pub struct SplitData {
    pub train_x: Array2<f32>,
    pub test_x: Array2<f32>,
    pub train_y: Vec<usize>,
    pub test_y: Vec<usize>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Partition `(x, y)` into train and test subsets, class-proportionally.
///
/// Row indices are grouped by class, each group is shuffled with the seeded
/// rng and cut at `round(count * test_fraction)` (clamped so both partitions
/// keep at least one member of every class), and each partition's row order
/// is shuffled again so the model does not see classes in contiguous blocks.
///
/// Fails with `InsufficientData` if any class has fewer than 2 members.
pub fn stratified_split(
    x: &Array2<f32>,
    y: &[usize],
    config: &SplitConfig,
) -> Result<SplitData, PipelineError> {
    assert_eq!(x.nrows(), y.len(), "feature rows and labels must align");
    assert!(
        config.test_fraction > 0.0 && config.test_fraction < 1.0,
        "test fraction must lie in (0, 1)"
    );

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &class) in y.iter().enumerate() {
        by_class.entry(class).or_default().push(row);
    }

    for (&class, rows) in &by_class {
        if rows.len() < 2 {
            return Err(PipelineError::InsufficientData {
                class: class.to_string(),
                count: rows.len(),
            });
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for rows in by_class.values() {
        let mut rows = rows.clone();
        rows.shuffle(&mut rng);

        let n_test = (rows.len() as f32 * config.test_fraction)
            .round()
            .max(1.0) as usize;
        let n_test = n_test.min(rows.len() - 1);

        test_indices.extend_from_slice(&rows[..n_test]);
        train_indices.extend_from_slice(&rows[n_test..]);
    }

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    log::debug!(
        "stratified split: {} train rows, {} test rows over {} class(es)",
        train_indices.len(),
        test_indices.len(),
        by_class.len()
    );

    Ok(SplitData {
        train_x: x.select(Axis(0), &train_indices),
        test_x: x.select(Axis(0), &test_indices),
        train_y: train_indices.iter().map(|&i| y[i]).collect(),
        test_y: test_indices.iter().map(|&i| y[i]).collect(),
        train_indices,
        test_indices,
    })
}
