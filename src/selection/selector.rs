//! The fit/transform selector orchestrating both reduction stages.

use std::sync::Arc;

use faer::Mat;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::estimator::Estimator;
use crate::selection::elimination::{run_elimination, CandidateScore};
use crate::selection::gather_columns;
use crate::selection::redundancy::reduce_correlated;
use crate::selection::validation::Scoring;

/// Configuration for [`FeatureSelector`].
///
/// The estimator is deliberately not part of this struct so the rest stays
/// serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Floor on the final selected count. When elimination keeps fewer
    /// features than this, the mask is overridden with the
    /// `min_features_to_select` best-ranked features instead.
    pub min_features_to_select: usize,
    /// Ceiling on the elimination result. When exceeded, correlation
    /// clustering narrows the mask to one representative per cluster
    /// (which may still leave more than this many features if the data is
    /// not redundant enough).
    pub max_features_to_select: usize,
    /// Features eliminated per elimination round
    pub step: usize,
    /// Number of stratified cross-validation folds
    pub cv: usize,
    /// Metric maximized during the elimination search
    pub scoring: Scoring,
    /// Dendrogram cut distance in dissimilarity (1 - Pearson r) units.
    ///
    /// Despite the name this is not a correlation floor: *raising* it
    /// merges features more aggressively. The default of 0.8 clusters
    /// features together once their complete-linkage correlation reaches
    /// 0.2, not only near-duplicates.
    pub cross_correlation_threshold: f64,
    /// Parallelism for fold scoring: positive = that many threads,
    /// anything else = all available cores
    pub n_jobs: i32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_features_to_select: 1,
            max_features_to_select: 50,
            step: 1,
            cv: 5,
            scoring: Scoring::F1,
            cross_correlation_threshold: 0.8,
            n_jobs: -1,
        }
    }
}

impl SelectorConfig {
    /// Rejects unusable configurations before any work happens.
    pub fn validate(&self) -> Result<()> {
        if self.min_features_to_select == 0 {
            return Err(SelectError::Config(
                "min_features_to_select must be at least 1".to_string(),
            ));
        }
        if self.max_features_to_select < self.min_features_to_select {
            return Err(SelectError::Config(format!(
                "max_features_to_select ({}) is below min_features_to_select ({})",
                self.max_features_to_select, self.min_features_to_select
            )));
        }
        if self.step == 0 {
            return Err(SelectError::Config("step must be at least 1".to_string()));
        }
        if self.cv < 2 {
            return Err(SelectError::Config(
                "cv must be at least 2 folds".to_string(),
            ));
        }
        if !self.cross_correlation_threshold.is_finite() || self.cross_correlation_threshold < 0.0 {
            return Err(SelectError::Config(
                "cross_correlation_threshold must be a finite non-negative distance".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read-only snapshot of a fitted selector, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    /// Columns in the training matrix
    pub n_features_in: usize,
    /// Columns surviving both stages
    pub n_features_selected: usize,
    /// Count the elimination search settled on, before bounds enforcement
    pub elimination_count: usize,
    /// Mean cross-validated score per candidate count
    pub score_grid: Vec<CandidateScore>,
}

#[derive(Debug, Clone)]
struct FittedState {
    support: Vec<bool>,
    ranking: Vec<u32>,
    elimination_count: usize,
    score_grid: Vec<CandidateScore>,
}

/// Two-stage feature selector with a fit/transform contract.
///
/// `fit` runs cross-validated recursive elimination (always with an
/// internal floor of one feature), then enforces the configured bounds:
/// an undershoot is overridden with the best-ranked features, an overshoot
/// is narrowed by correlation clustering. The resulting mask and ranking
/// are frozen until the next `fit`, which replaces them entirely.
///
/// `transform` is read-only over the frozen state, so a fitted selector
/// can be shared across threads.
pub struct FeatureSelector {
    estimator: Arc<dyn Estimator>,
    config: SelectorConfig,
    fitted: Option<FittedState>,
}

impl FeatureSelector {
    /// Creates a selector with the default configuration.
    pub fn new(estimator: Arc<dyn Estimator>) -> Self {
        Self::with_config(estimator, SelectorConfig::default())
    }

    pub fn with_config(estimator: Arc<dyn Estimator>, config: SelectorConfig) -> Self {
        FeatureSelector {
            estimator,
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Learns the feature mask from a training matrix and its labels.
    ///
    /// # Errors
    /// Fails fast on configuration or shape problems, and on degenerate
    /// input data (zero-variance selected columns) during redundancy
    /// reduction. Estimator non-convergence inside the elimination search
    /// is expected and never surfaces here.
    pub fn fit(&mut self, x: &Mat<f64>, y: &[f64]) -> Result<()> {
        self.config.validate()?;

        let (n, d) = (x.nrows(), x.ncols());
        if n == 0 || d == 0 {
            return Err(SelectError::Shape(
                "training matrix must have at least one row and one column".to_string(),
            ));
        }
        if y.len() != n {
            return Err(SelectError::Shape(format!(
                "label vector has {} entries for {} rows",
                y.len(),
                n
            )));
        }
        if self.config.min_features_to_select > d {
            return Err(SelectError::Config(format!(
                "min_features_to_select ({}) exceeds the {} available features",
                self.config.min_features_to_select, d
            )));
        }

        // A re-fit fully replaces previous state, never merges with it
        self.fitted = None;

        let elimination = run_elimination(
            x,
            y,
            self.estimator.as_ref(),
            self.config.step,
            self.config.cv,
            self.config.scoring,
            self.config.n_jobs,
        )?;

        let selected = elimination.support.iter().filter(|&&s| s).count();
        let support = if selected < self.config.min_features_to_select {
            top_ranked_mask(&elimination.ranking, self.config.min_features_to_select)
        } else if selected > self.config.max_features_to_select {
            reduce_correlated(
                x,
                &elimination.support,
                self.config.cross_correlation_threshold,
            )?
        } else {
            elimination.support
        };

        self.fitted = Some(FittedState {
            support,
            ranking: elimination.ranking,
            elimination_count: elimination.n_features,
            score_grid: elimination.score_grid,
        });
        Ok(())
    }

    /// Restricts `x` to the selected columns, preserving column order.
    ///
    /// # Errors
    /// Fails if the selector is unfitted or `x` has a different column
    /// count than the training matrix.
    pub fn transform(&self, x: &Mat<f64>) -> Result<Mat<f64>> {
        let state = self.fitted.as_ref().ok_or(SelectError::NotFitted)?;
        if x.ncols() != state.support.len() {
            return Err(SelectError::Shape(format!(
                "matrix has {} columns but the selector was fitted on {}",
                x.ncols(),
                state.support.len()
            )));
        }
        let keep: Vec<usize> = state
            .support
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect();
        Ok(gather_columns(x, None, &keep))
    }

    /// The frozen keep-mask over the training columns.
    pub fn get_support(&self) -> Result<&[bool]> {
        self.fitted
            .as_ref()
            .map(|state| state.support.as_slice())
            .ok_or(SelectError::NotFitted)
    }

    /// The frozen 1-indexed importance ranking (1 = most important).
    pub fn ranking(&self) -> Result<&[u32]> {
        self.fitted
            .as_ref()
            .map(|state| state.ranking.as_slice())
            .ok_or(SelectError::NotFitted)
    }

    /// Summary of the fitted selection, suitable for serialization.
    pub fn summary(&self) -> Result<SelectionSummary> {
        let state = self.fitted.as_ref().ok_or(SelectError::NotFitted)?;
        Ok(SelectionSummary {
            n_features_in: state.support.len(),
            n_features_selected: state.support.iter().filter(|&&s| s).count(),
            elimination_count: state.elimination_count,
            score_grid: state.score_grid.clone(),
        })
    }
}

/// Mask of the `k` best-ranked features; rank ties keep the lower column
/// index, so the result is deterministic.
pub fn top_ranked_mask(ranking: &[u32], k: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..ranking.len()).collect();
    order.sort_by_key(|&i| (ranking[i], i));

    let mut mask = vec![false; ranking.len()];
    for &i in order.iter().take(k) {
        mask[i] = true;
    }
    mask
}
