//! Cross-validation splitting and fold scoring.

use serde::{Deserialize, Serialize};
use smartcore::metrics::f1;

use crate::error::{Result, SelectError};

/// Metric maximized while searching for the best surviving feature count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scoring {
    /// Binary F1 with 1.0 as the positive class (default)
    #[default]
    F1,
    /// Fraction of exactly matching predictions
    Accuracy,
}

impl Scoring {
    /// Scores predictions against ground truth. Higher is better.
    pub fn score(self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        match self {
            Scoring::F1 => {
                let t = y_true.to_vec();
                let p = y_pred.to_vec();
                f1(&t, &p, 1.0)
            }
            Scoring::Accuracy => {
                if y_true.is_empty() {
                    return 0.0;
                }
                let correct = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .filter(|(t, p)| (t.round() - p.round()).abs() < 0.1)
                    .count();
                correct as f64 / y_true.len() as f64
            }
        }
    }
}

impl std::fmt::Display for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scoring::F1 => write!(f, "f1"),
            Scoring::Accuracy => write!(f, "accuracy"),
        }
    }
}

impl std::str::FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f1" => Ok(Scoring::F1),
            "accuracy" => Ok(Scoring::Accuracy),
            _ => Err(format!("Unknown scoring metric: '{}'. Use 'f1' or 'accuracy'.", s)),
        }
    }
}

/// Deterministic stratified k-fold splitter.
///
/// Samples of each class are dealt round-robin across folds in encounter
/// order, so every fold sees roughly the class proportions of the whole
/// dataset and repeated splits of the same labels are identical. There is
/// no shuffling.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        StratifiedKFold { n_splits }
    }

    /// Produces `(train_indices, test_indices)` per fold.
    ///
    /// # Errors
    /// Fails when fewer than 2 splits are requested or there are fewer
    /// samples than folds.
    pub fn split(&self, y: &[f64]) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(SelectError::Config(
                "cross-validation requires at least 2 folds".to_string(),
            ));
        }
        if y.len() < self.n_splits {
            return Err(SelectError::Shape(format!(
                "cannot split {} samples into {} folds",
                y.len(),
                self.n_splits
            )));
        }

        // Class groups in encounter order; class codes are compared exactly.
        let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
        for (i, &label) in y.iter().enumerate() {
            match groups.iter_mut().find(|(code, _)| *code == label) {
                Some((_, members)) => members.push(i),
                None => groups.push((label, vec![i])),
            }
        }

        let mut fold_of = vec![0usize; y.len()];
        for (_, members) in &groups {
            for (k, &idx) in members.iter().enumerate() {
                fold_of[idx] = k % self.n_splits;
            }
        }

        let folds = (0..self.n_splits)
            .map(|fold| {
                let mut train = Vec::new();
                let mut test = Vec::new();
                for (idx, &assigned) in fold_of.iter().enumerate() {
                    if assigned == fold {
                        test.push(idx);
                    } else {
                        train.push(idx);
                    }
                }
                (train, test)
            })
            .collect();

        Ok(folds)
    }
}
