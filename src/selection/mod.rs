//! Selection pipeline - recursive elimination plus correlation-cluster pruning

pub mod correlation;
pub mod elimination;
pub mod redundancy;
pub mod selector;
pub mod validation;

pub use correlation::*;
pub use elimination::*;
pub use redundancy::*;
pub use selector::*;
pub use validation::*;

use faer::Mat;

/// Copies the requested columns (and optionally rows) out of `x` into a new
/// matrix, preserving order.
pub(crate) fn gather_columns(x: &Mat<f64>, rows: Option<&[usize]>, cols: &[usize]) -> Mat<f64> {
    match rows {
        Some(r) => Mat::from_fn(r.len(), cols.len(), |i, j| x[(r[i], cols[j])]),
        None => Mat::from_fn(x.nrows(), cols.len(), |i, j| x[(i, cols[j])]),
    }
}
