//! Unit tests for the DataFrame extraction boundary

use polars::prelude::*;
use rhosel::frame::{feature_matrix, label_vector};

fn sample_frame() -> DataFrame {
    df! {
        "target" => [0i32, 1, 0, 1, 0],
        "age" => [61.0f64, 54.0, 70.0, 48.0, 66.0],
        "lvef" => [25i32, 40, 31, 55, 28],
        "site" => ["a", "b", "a", "c", "b"],
    }
    .unwrap()
}

#[test]
fn test_numeric_columns_become_features() {
    let df = sample_frame();
    let (matrix, names) = feature_matrix(&df, &["target"]).unwrap();

    // Strings are skipped, the excluded target is skipped, ints are cast
    assert_eq!(names, vec!["age".to_string(), "lvef".to_string()]);
    assert_eq!(matrix.nrows(), 5);
    assert_eq!(matrix.ncols(), 2);
    assert_eq!(matrix[(0, 0)], 61.0);
    assert_eq!(matrix[(1, 1)], 40.0);
}

#[test]
fn test_feature_order_follows_frame_order() {
    let df = df! {
        "b" => [1.0f64, 2.0],
        "a" => [3.0f64, 4.0],
    }
    .unwrap();

    let (_, names) = feature_matrix(&df, &[]).unwrap();
    assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn test_null_feature_values_are_rejected() {
    let df = df! {
        "target" => [0i32, 1, 0],
        "feature" => [Some(1.0f64), None, Some(3.0)],
    }
    .unwrap();

    let err = feature_matrix(&df, &["target"]).unwrap_err();
    assert!(err.to_string().contains("null"));
}

#[test]
fn test_no_numeric_columns_is_an_error() {
    let df = df! {
        "site" => ["a", "b", "c"],
    }
    .unwrap();

    assert!(feature_matrix(&df, &[]).is_err());
}

#[test]
fn test_label_vector_extraction() {
    let df = sample_frame();
    let labels = label_vector(&df, "target").unwrap();

    assert_eq!(labels, vec![0.0, 1.0, 0.0, 1.0, 0.0]);
}

#[test]
fn test_missing_label_column_is_an_error() {
    let df = sample_frame();
    let err = label_vector(&df, "diagnosis").unwrap_err();
    assert!(err.to_string().contains("diagnosis"));
}

#[test]
fn test_null_labels_are_rejected() {
    let df = df! {
        "target" => [Some(0i32), None, Some(1)],
    }
    .unwrap();

    assert!(label_vector(&df, "target").is_err());
}
