//! Error types for the selection core.
//!
//! Estimator non-convergence inside the cross-validated elimination loop is
//! deliberately *not* represented here: those failures are expected noise and
//! are swallowed at the elimination boundary. Everything below is a genuine
//! caller-facing fault.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectError {
    /// `transform`, `get_support` or `ranking` called before `fit`.
    #[error("selector has not been fitted; call fit(X, y) first")]
    NotFitted,

    /// Configuration rejected up front (inverted bounds, zero step, ...).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input dimensions disagree with each other or with the fitted state.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// A selected feature column has zero variance, so its Pearson
    /// correlation with every other column is undefined. This is an
    /// input-quality fault and is never silently repaired.
    #[error("feature column {index} has zero variance; correlation is undefined")]
    DegenerateColumn { index: usize },

    /// The correlation matrix contains NaN entries despite per-column
    /// variance checks (e.g. non-finite values in the input data).
    #[error("correlation matrix contains undefined values; check input data for NaN or infinity")]
    UndefinedCorrelation,

    /// The wrapped estimator violated its contract outside the suppressed
    /// cross-validation path (e.g. returned an importance vector of the
    /// wrong length).
    #[error("estimator failure: {0}")]
    Estimator(String),
}

pub type Result<T> = std::result::Result<T, SelectError>;
