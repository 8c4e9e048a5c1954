//! Rhosel: Correlation-Aware Feature Selection
//!
//! A library for narrowing wide feature matrices ahead of classifier training,
//! using cross-validated recursive elimination followed by correlation-cluster
//! pruning when too many features survive.

pub mod error;
pub mod estimator;
pub mod frame;
pub mod labels;
pub mod selection;

pub use error::{Result, SelectError};
pub use selection::{FeatureSelector, Scoring, SelectorConfig};
