pub mod classifier_trait;
pub mod factory;
pub mod mlp;

use serde::{Deserialize, Serialize};

pub use classifier_trait::Classifier;

/// Serializable weights of a trained classifier, for artifact bundling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModelState {
    Mlp(mlp::MlpState),
}

/// Index of the highest score, ties broken by lowest index.
pub fn argmax(scores: &[f32]) -> usize {
    assert!(!scores.is_empty(), "argmax over empty scores");
    let mut best = 0;
    for (i, &v) in scores.iter().enumerate().skip(1) {
        if v > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::argmax;

    #[test]
    fn argmax_picks_highest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
    }

    #[test]
    fn argmax_tie_breaks_to_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), 0);
        assert_eq!(argmax(&[0.1, 0.4, 0.4]), 1);
    }

    #[test]
    fn argmax_single_element() {
        assert_eq!(argmax(&[3.0]), 0);
    }
}
