//! Shared test utilities and fixture generators

use faer::Mat;
use rhosel::error::Result;
use rhosel::estimator::{Estimator, FittedModel};

/// Mean-centered, mutually orthogonal sign patterns over 8 observations
/// (rows of a Walsh-Hadamard matrix). Any two have exactly zero Pearson
/// correlation.
const H1: [f64; 8] = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
const H2: [f64; 8] = [1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0];
const H3: [f64; 8] = [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];
const H4: [f64; 8] = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0];
const H5: [f64; 8] = [1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0];
const H6: [f64; 8] = [1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0];

/// 8x6 feature matrix with a known correlation structure:
/// columns {0,1} and {2,3} are near-perfectly correlated pairs
/// (r = 1/sqrt(1.01) ~ 0.995), everything else is exactly uncorrelated.
pub fn two_pairs_two_singletons() -> Mat<f64> {
    Mat::from_fn(8, 6, |i, j| match j {
        0 => H1[i],
        1 => H1[i] + 0.1 * H5[i],
        2 => H2[i],
        3 => H2[i] + 0.1 * H6[i],
        4 => H3[i],
        _ => H4[i],
    })
}

/// Matrix where every column is an exact copy of the label vector; any
/// feature subset predicts perfectly and all columns are fully correlated.
pub fn identical_columns(y: &[f64], d: usize) -> Mat<f64> {
    Mat::from_fn(y.len(), d, |i, _| y[i])
}

/// Balanced alternating binary labels.
pub fn alternating_labels(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i % 2) as f64).collect()
}

/// Estimator whose importance signal is the column mean of whatever
/// matrix it is fitted on. Deterministic and data-derived, so elimination
/// order is fully controlled by the fixture.
pub struct ColumnMeanImportance;

impl Estimator for ColumnMeanImportance {
    fn fit(&self, x: &Mat<f64>, _y: &[f64]) -> Result<Box<dyn FittedModel>> {
        let importances = (0..x.ncols())
            .map(|j| (0..x.nrows()).map(|i| x[(i, j)]).sum::<f64>() / x.nrows() as f64)
            .collect();
        Ok(Box::new(RowMeanModel {
            importances,
            invert: false,
        }))
    }
}

/// Estimator that predicts well only when it sees at least
/// `required_features` columns, and inverts its predictions otherwise.
/// Fitted on `identical_columns` data, the cross-validated search is
/// forced to settle on exactly `required_features` survivors.
pub struct SubsetSizeEstimator {
    pub required_features: usize,
}

impl Estimator for SubsetSizeEstimator {
    fn fit(&self, x: &Mat<f64>, _y: &[f64]) -> Result<Box<dyn FittedModel>> {
        Ok(Box::new(RowMeanModel {
            importances: vec![1.0; x.ncols()],
            invert: x.ncols() < self.required_features,
        }))
    }
}

/// Estimator that always fails to fit, for suppression tests.
pub struct AlwaysFailingEstimator;

impl Estimator for AlwaysFailingEstimator {
    fn fit(&self, _x: &Mat<f64>, _y: &[f64]) -> Result<Box<dyn FittedModel>> {
        Err(rhosel::SelectError::Estimator(
            "synthetic non-convergence".to_string(),
        ))
    }
}

struct RowMeanModel {
    importances: Vec<f64>,
    invert: bool,
}

impl FittedModel for RowMeanModel {
    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        Ok((0..x.nrows())
            .map(|i| {
                let mean =
                    (0..x.ncols()).map(|j| x[(i, j)]).sum::<f64>() / x.ncols() as f64;
                let label = mean.round().clamp(0.0, 1.0);
                if self.invert {
                    1.0 - label
                } else {
                    label
                }
            })
            .collect())
    }

    fn importances(&self) -> Vec<f64> {
        self.importances.clone()
    }
}
