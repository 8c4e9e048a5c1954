//! Logistic regression estimator backed by smartcore.
//!
//! This is the default estimator for the selection pipeline. Feature
//! importance is the mean absolute coefficient per column; for binary
//! problems that reduces to |w_j|.

use faer::Mat;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

use crate::error::{Result, SelectError};
use crate::estimator::{Estimator, FittedModel};

/// Logistic regression with L2 regularization.
pub struct LogisticEstimator {
    alpha: f64,
}

impl LogisticEstimator {
    pub fn new() -> Self {
        LogisticEstimator { alpha: 0.0 }
    }

    /// Sets the L2 regularization strength.
    pub fn with_alpha(alpha: f64) -> Self {
        LogisticEstimator { alpha }
    }
}

impl Default for LogisticEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for LogisticEstimator {
    fn fit(&self, x: &Mat<f64>, y: &[f64]) -> Result<Box<dyn FittedModel>> {
        let dense = to_dense(x)?;
        // smartcore wants ordinal class labels
        let classes: Vec<i32> = y.iter().map(|v| v.round() as i32).collect();
        let params = LogisticRegressionParameters::default().with_alpha(self.alpha);
        let model = LogisticRegression::fit(&dense, &classes, params)
            .map_err(|e| SelectError::Estimator(e.to_string()))?;
        Ok(Box::new(FittedLogistic { model }))
    }
}

struct FittedLogistic {
    model: LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

impl FittedModel for FittedLogistic {
    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        let dense = to_dense(x)?;
        let labels = self
            .model
            .predict(&dense)
            .map_err(|e| SelectError::Estimator(e.to_string()))?;
        Ok(labels.into_iter().map(f64::from).collect())
    }

    fn importances(&self) -> Vec<f64> {
        let coef = self.model.coefficients();
        let (rows, cols) = coef.shape();
        (0..cols)
            .map(|j| {
                let total: f64 = (0..rows).map(|i| coef.get((i, j)).abs()).sum();
                total / rows as f64
            })
            .collect()
    }
}

/// Copies a faer matrix into smartcore's dense row-major representation.
fn to_dense(x: &Mat<f64>) -> Result<DenseMatrix<f64>> {
    let rows: Vec<Vec<f64>> = (0..x.nrows())
        .map(|i| (0..x.ncols()).map(|j| x[(i, j)]).collect())
        .collect();
    Ok(DenseMatrix::from_2d_vec(&rows))
}
