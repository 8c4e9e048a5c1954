//! DataFrame boundary - numeric feature extraction.
//!
//! The selector itself works on dense matrices; this module is the bridge
//! from columnar datasets. Only numeric columns become features, everything
//! is cast to Float64, and missing values are rejected loudly: the
//! correlation stage cannot tolerate silently imputed data.

use anyhow::{bail, Context, Result};
use faer::Mat;
use polars::prelude::*;

/// Extracts a dense feature matrix from the numeric columns of `df`.
///
/// Columns named in `exclude` (targets, weights, identifiers) and
/// non-numeric columns are skipped. Returns the matrix together with the
/// names of the columns that became features, in frame order.
///
/// # Errors
/// Fails when no numeric feature column remains, the frame is empty, or
/// any feature column contains null values.
pub fn feature_matrix(df: &DataFrame, exclude: &[&str]) -> Result<(Mat<f64>, Vec<String>)> {
    let feature_cols: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| {
            col.dtype().is_primitive_numeric() && !exclude.contains(&col.name().as_str())
        })
        .map(|col| col.name().to_string())
        .collect();

    if feature_cols.is_empty() {
        bail!("no numeric feature columns found");
    }
    let n_rows = df.height();
    if n_rows == 0 {
        bail!("dataset has no rows");
    }

    let mut mat = Mat::<f64>::zeros(n_rows, feature_cols.len());
    for (j, name) in feature_cols.iter().enumerate() {
        let column = df
            .column(name)?
            .cast(&DataType::Float64)
            .with_context(|| format!("failed to cast feature column '{}' to Float64", name))?;
        let values = column.f64()?;

        if values.null_count() > 0 {
            bail!(
                "feature column '{}' contains {} null values; impute or drop it before selection",
                name,
                values.null_count()
            );
        }

        for (i, value) in values.iter().enumerate() {
            if let Some(v) = value {
                mat[(i, j)] = v;
            }
        }
    }

    Ok((mat, feature_cols))
}

/// Extracts a label vector from one column of `df`.
///
/// # Errors
/// Fails when the column is missing, cannot be cast to numeric, or
/// contains null values.
pub fn label_vector(df: &DataFrame, target: &str) -> Result<Vec<f64>> {
    let column = df
        .column(target)
        .with_context(|| format!("label column '{}' not found", target))?;

    let float = column
        .cast(&DataType::Float64)
        .with_context(|| format!("label column '{}' is not numeric", target))?;
    let values = float.f64()?;

    if values.null_count() > 0 {
        bail!(
            "label column '{}' contains {} null values",
            target,
            values.null_count()
        );
    }

    Ok(values.iter().flatten().collect())
}
