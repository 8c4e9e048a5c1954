//! Cross-validated recursive feature elimination.
//!
//! The search mirrors the classic RFECV procedure: each fold runs a full
//! elimination pass on its training split, scoring the held-out split at
//! every candidate feature count; the count with the best mean score wins
//! (ties go to the smaller count), and a final elimination pass over the
//! whole dataset produces the support mask and ranking for that count.
//!
//! Estimator failures inside this module are expected - regularized
//! logistic fits on shrinking feature subsets routinely fail to converge -
//! and are swallowed: a failed scoring fit leaves a hole in the score grid,
//! a failed ranking fit freezes elimination where it stands. Nothing here
//! surfaces them to the caller.

use std::cmp::Ordering;

use faer::Mat;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, SelectError};
use crate::estimator::Estimator;
use crate::selection::gather_columns;
use crate::selection::validation::{Scoring, StratifiedKFold};

/// Mean cross-validated score for one candidate feature count.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    /// Number of surviving features at this point of the elimination path
    pub n_features: usize,
    /// Mean held-out score across the folds that produced one
    pub mean_score: Option<f64>,
    /// How many folds contributed a score
    pub folds_scored: usize,
}

/// Outcome of the cross-validated elimination search.
#[derive(Debug, Clone)]
pub struct Elimination {
    /// Keep-mask over the original columns
    pub support: Vec<bool>,
    /// 1-indexed importance ranking, parallel to the original columns;
    /// every selected feature ranks 1
    pub ranking: Vec<u32>,
    /// Feature count the search settled on
    pub n_features: usize,
    /// Score grid in ascending feature-count order
    pub score_grid: Vec<CandidateScore>,
}

/// Runs the full cross-validated elimination search.
///
/// The internal floor is always a single feature; enforcing a configured
/// minimum is the orchestrator's job, applied after the search.
///
/// # Errors
/// Fails on invalid fold configuration or when an estimator breaks its
/// importance contract. Estimator convergence failures are suppressed.
pub fn run_elimination(
    x: &Mat<f64>,
    y: &[f64],
    estimator: &dyn Estimator,
    step: usize,
    folds: usize,
    scoring: Scoring,
    n_jobs: i32,
) -> Result<Elimination> {
    let d = x.ncols();
    let counts = candidate_counts(d, step);
    let splits = StratifiedKFold::new(folds).split(y)?;

    let pb = ProgressBar::new(splits.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "   Scoring elimination path [{bar:40.cyan/blue}] {pos}/{len} folds ({percent}%) [{eta}]",
            )
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let score_fold = |(train, test): &(Vec<usize>, Vec<usize>)| -> Vec<Option<f64>> {
        let scores = eliminate_scoring_fold(x, y, estimator, step, &counts, train, test, scoring);
        pb.inc(1);
        scores
    };

    let fold_scores: Vec<Vec<Option<f64>>> = if n_jobs == 1 {
        splits.iter().map(score_fold).collect()
    } else {
        let threads = if n_jobs > 0 { n_jobs as usize } else { 0 };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SelectError::Config(format!("failed to build thread pool: {}", e)))?;
        pool.install(|| splits.par_iter().map(score_fold).collect())
    };

    // Aggregate into ascending feature-count order
    let score_grid: Vec<CandidateScore> = counts
        .iter()
        .enumerate()
        .rev()
        .map(|(ci, &count)| {
            let scored: Vec<f64> = fold_scores.iter().filter_map(|f| f[ci]).collect();
            CandidateScore {
                n_features: count,
                mean_score: if scored.is_empty() {
                    None
                } else {
                    Some(scored.iter().sum::<f64>() / scored.len() as f64)
                },
                folds_scored: scored.len(),
            }
        })
        .collect();

    let best = score_grid
        .iter()
        .filter_map(|c| c.mean_score.map(|s| (c.n_features, s)))
        .fold(None::<(usize, f64)>, |acc, (count, score)| match acc {
            Some((_, best_score)) if score <= best_score => acc,
            _ => Some((count, score)),
        });

    let chosen = match best {
        Some((count, _)) => count,
        // Every fit failed on every fold; elimination has nothing to say
        None => {
            pb.finish_with_message("   [!] No fold produced a score; keeping all features");
            return Ok(Elimination {
                support: vec![true; d],
                ranking: vec![1; d],
                n_features: d,
                score_grid,
            });
        }
    };

    pb.finish_with_message(format!(
        "   [OK] Scored {} candidate counts across {} folds; best at {} features",
        counts.len(),
        splits.len(),
        chosen
    ));

    let (support, ranking) = recursive_eliminate(x, y, estimator, step, chosen)?;

    Ok(Elimination {
        support,
        ranking,
        n_features: chosen,
        score_grid,
    })
}

/// Candidate feature counts in elimination order: `d`, then `step` fewer
/// each round (clamped so the path always ends at exactly 1).
pub fn candidate_counts(d: usize, step: usize) -> Vec<usize> {
    let mut counts = vec![d];
    let mut current = d;
    while current > 1 {
        current -= step.min(current - 1);
        counts.push(current);
    }
    counts
}

/// Single elimination pass down to `target` features.
///
/// Ranking follows the usual convention: all eliminated features get one
/// rank bump per subsequent round, so the first casualties carry the
/// highest numbers and every survivor ranks 1. Importance ties eliminate
/// the lower column index first (stable sort).
///
/// # Errors
/// Fails if the estimator reports importances whose length does not match
/// the fitted column count. A failed fit is suppressed: elimination stops
/// and the current mask stands.
pub fn recursive_eliminate(
    x: &Mat<f64>,
    y: &[f64],
    estimator: &dyn Estimator,
    step: usize,
    target: usize,
) -> Result<(Vec<bool>, Vec<u32>)> {
    let d = x.ncols();
    let mut support = vec![true; d];
    let mut ranking = vec![1u32; d];
    let mut remaining: Vec<usize> = (0..d).collect();

    while remaining.len() > target {
        let sub = gather_columns(x, None, &remaining);
        let fitted = match estimator.fit(&sub, y) {
            Ok(fitted) => fitted,
            // Non-convergence: freeze the mask where it stands
            Err(_) => break,
        };

        let importances = fitted.importances();
        if importances.len() != remaining.len() {
            return Err(SelectError::Estimator(format!(
                "importance vector has length {} for {} features",
                importances.len(),
                remaining.len()
            )));
        }

        let n_drop = step.min(remaining.len() - target);
        let mut order: Vec<usize> = (0..remaining.len()).collect();
        order.sort_by(|&a, &b| {
            importances[a]
                .partial_cmp(&importances[b])
                .unwrap_or(Ordering::Equal)
        });

        let mut dropped = vec![false; remaining.len()];
        for &local in order.iter().take(n_drop) {
            dropped[local] = true;
            support[remaining[local]] = false;
        }
        remaining = remaining
            .iter()
            .zip(dropped.iter())
            .filter_map(|(&col, &gone)| (!gone).then_some(col))
            .collect();

        for (col, rank) in ranking.iter_mut().enumerate() {
            if !support[col] {
                *rank += 1;
            }
        }
    }

    Ok((support, ranking))
}

/// Scores one fold's elimination path.
///
/// Returns one entry per candidate count, in the same (descending) order
/// as `counts`. Fits are reused: the model trained at a given count both
/// scores that count on the held-out split and ranks features for the next
/// drop. Any fit/predict failure or NaN score leaves `None` from that
/// point on.
#[allow(clippy::too_many_arguments)]
fn eliminate_scoring_fold(
    x: &Mat<f64>,
    y: &[f64],
    estimator: &dyn Estimator,
    step: usize,
    counts: &[usize],
    train: &[usize],
    test: &[usize],
    scoring: Scoring,
) -> Vec<Option<f64>> {
    let d = x.ncols();
    let mut scores = vec![None; counts.len()];
    let mut remaining: Vec<usize> = (0..d).collect();

    let y_train: Vec<f64> = train.iter().map(|&i| y[i]).collect();
    let y_test: Vec<f64> = test.iter().map(|&i| y[i]).collect();

    for ci in 0..counts.len() {
        let x_train = gather_columns(x, Some(train), &remaining);
        let fitted = match estimator.fit(&x_train, &y_train) {
            Ok(fitted) => fitted,
            Err(_) => break,
        };

        let x_test = gather_columns(x, Some(test), &remaining);
        if let Ok(predictions) = fitted.predict(&x_test) {
            let score = scoring.score(&y_test, &predictions);
            if !score.is_nan() {
                scores[ci] = Some(score);
            }
        }

        if ci + 1 < counts.len() {
            let next = counts[ci + 1];
            let importances = fitted.importances();
            if importances.len() != remaining.len() {
                break;
            }
            let n_drop = remaining.len() - next;
            let mut order: Vec<usize> = (0..remaining.len()).collect();
            order.sort_by(|&a, &b| {
                importances[a]
                    .partial_cmp(&importances[b])
                    .unwrap_or(Ordering::Equal)
            });
            let mut dropped = vec![false; remaining.len()];
            for &local in order.iter().take(n_drop) {
                dropped[local] = true;
            }
            remaining = remaining
                .iter()
                .zip(dropped.iter())
                .filter_map(|(&col, &gone)| (!gone).then_some(col))
                .collect();
        }
    }

    scores
}
