//! Estimator abstraction driving the elimination search.
//!
//! Any classifier that can train on a feature matrix and report a
//! per-feature importance score can drive recursive elimination. Fitting
//! produces a separate fitted model so that cross-validation folds can be
//! trained concurrently from one shared estimator configuration.

pub mod logistic;

pub use logistic::LogisticEstimator;

use crate::error::Result;
use faer::Mat;

/// An unfitted classifier configuration.
///
/// Implementations must be cheap to share: the elimination stage calls
/// [`Estimator::fit`] once per fold per elimination round.
pub trait Estimator: Send + Sync {
    /// Trains on `x` (observations x features) against class labels `y`
    /// and returns the fitted model.
    ///
    /// # Errors
    /// Returns an error if training fails (e.g. the solver does not
    /// converge). Inside the cross-validated elimination loop such errors
    /// are expected and suppressed by the caller.
    fn fit(&self, x: &Mat<f64>, y: &[f64]) -> Result<Box<dyn FittedModel>>;
}

/// A trained classifier able to predict and rank its input features.
pub trait FittedModel: Send {
    /// Predicted class labels for each row of `x`.
    ///
    /// # Errors
    /// Returns an error if prediction fails.
    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>>;

    /// Importance score per feature column of the training matrix,
    /// higher = more important. Length must equal the number of columns
    /// the model was fitted on.
    fn importances(&self) -> Vec<f64>;
}
