//! Pearson correlation over a column subset.
//!
//! The matrix is computed the standardized way: each selected column is
//! centered and scaled to unit norm, so the correlation matrix is a single
//! `Z^T * Z` product. A zero-variance column is a fatal input-quality fault
//! here, not something to skip - downstream clustering cannot work with
//! undefined correlations.

use faer::Mat;

use crate::error::{Result, SelectError};

/// Computes the Pearson correlation matrix over `columns` of `x`.
///
/// The result is square with side `columns.len()`, symmetric, with a unit
/// diagonal (up to floating-point rounding).
///
/// # Errors
/// - [`SelectError::DegenerateColumn`] if a selected column has zero
///   variance (its correlations are undefined).
/// - [`SelectError::UndefinedCorrelation`] if NaN survives into the matrix
///   (non-finite input values).
/// - [`SelectError::Shape`] with fewer than 2 observations.
pub fn correlation_matrix(x: &Mat<f64>, columns: &[usize]) -> Result<Mat<f64>> {
    let n_rows = x.nrows();
    if n_rows < 2 {
        return Err(SelectError::Shape(
            "correlation requires at least 2 observations".to_string(),
        ));
    }

    let n = n_rows as f64;
    let m = columns.len();

    // Standardize: z_ik = (x_ik - mean_k) / (std_k * sqrt(n)), so that
    // Z^T * Z is directly the correlation matrix.
    let mut z = Mat::<f64>::zeros(n_rows, m);
    for (k, &col) in columns.iter().enumerate() {
        let mut sum = 0.0;
        for i in 0..n_rows {
            sum += x[(i, col)];
        }
        let mean = sum / n;

        let mut sq_dev = 0.0;
        for i in 0..n_rows {
            let dev = x[(i, col)] - mean;
            sq_dev += dev * dev;
        }
        let std = (sq_dev / n).sqrt();

        if std == 0.0 || !std.is_finite() {
            return Err(SelectError::DegenerateColumn { index: col });
        }

        let scale = std * n.sqrt();
        for i in 0..n_rows {
            z[(i, k)] = (x[(i, col)] - mean) / scale;
        }
    }

    let corr = z.transpose() * &z;

    for i in 0..m {
        for j in 0..m {
            if corr[(i, j)].is_nan() {
                return Err(SelectError::UndefinedCorrelation);
            }
        }
    }

    Ok(corr)
}
