//! Correlation-cluster pruning of an oversized support mask.
//!
//! Features that survived elimination but exceed the configured maximum are
//! grouped by agglomerative clustering over 1 - Pearson correlation, and a
//! single representative is kept per cluster. Ranking is untouched: this
//! stage only narrows the mask.

use std::collections::HashMap;

use faer::Mat;
use kodama::{linkage, Method};

use crate::error::{Result, SelectError};
use crate::selection::correlation::correlation_matrix;

/// Narrows `support` by keeping one representative per correlation cluster.
///
/// The dendrogram is built with complete linkage over the condensed
/// dissimilarity (1 - r) of the currently selected columns and cut at
/// `threshold` using the distance criterion: merges at or below the
/// threshold are applied, everything above stays separate. Note the
/// polarity: `threshold` is a *dissimilarity* cut, so 0.8 merges features
/// whose complete-linkage correlation is at least 0.2.
///
/// The result has exactly one bit set per cluster, always a subset of the
/// incoming mask.
///
/// # Errors
/// Fails on fewer than 2 selected features (clustering is undefined) and
/// propagates correlation faults (zero-variance columns are fatal).
pub fn reduce_correlated(x: &Mat<f64>, support: &[bool], threshold: f64) -> Result<Vec<bool>> {
    let selected: Vec<usize> = support
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect();

    if selected.len() < 2 {
        return Err(SelectError::Config(
            "redundancy reduction requires at least 2 selected features".to_string(),
        ));
    }

    let corr = correlation_matrix(x, &selected)?;
    let assignment = cluster_by_dissimilarity(&corr, threshold);
    let representatives = cluster_representatives(&corr, &assignment);

    let mut mask = vec![false; support.len()];
    for &local in &representatives {
        mask[selected[local]] = true;
    }
    Ok(mask)
}

/// Flat-clusters the features of a correlation matrix.
///
/// Returns one cluster id per row of `corr`. Ids are compact (0..k) and
/// assigned in order of each cluster's smallest member index, so the same
/// matrix always produces the same labelling.
pub fn cluster_by_dissimilarity(corr: &Mat<f64>, threshold: f64) -> Vec<usize> {
    let m = corr.nrows();

    // Condensed upper triangle, clamped against rounding below zero
    let mut condensed = Vec::with_capacity(m * (m - 1) / 2);
    for i in 0..m {
        for j in (i + 1)..m {
            condensed.push((1.0 - corr[(i, j)]).max(0.0));
        }
    }

    let dendrogram = linkage(&mut condensed, m, Method::Complete);

    // Walk the merge steps in dissimilarity order; leaves are 0..m, each
    // merge creates id m + step_index.
    let mut clusters: HashMap<usize, Vec<usize>> = (0..m).map(|i| (i, vec![i])).collect();
    let mut next_id = m;
    for step in dendrogram.steps() {
        if step.dissimilarity > threshold {
            break;
        }
        if let (Some(a), Some(b)) = (
            clusters.remove(&step.cluster1),
            clusters.remove(&step.cluster2),
        ) {
            let mut merged = a;
            merged.extend(b);
            clusters.insert(next_id, merged);
        }
        next_id += 1;
    }

    let mut groups: Vec<Vec<usize>> = clusters.into_values().collect();
    for group in &mut groups {
        group.sort_unstable();
    }
    groups.sort_by_key(|group| group[0]);

    let mut assignment = vec![0usize; m];
    for (id, group) in groups.iter().enumerate() {
        for &member in group {
            assignment[member] = id;
        }
    }
    assignment
}

/// Picks the representative member of each cluster.
///
/// The tie-break statistic is the population variance of a member's
/// correlation row restricted to its own cluster (diagonal included): the
/// member sitting most evenly among its cluster mates has the lowest
/// variance and wins. Exact ties go to the earliest member index.
pub fn cluster_representatives(corr: &Mat<f64>, assignment: &[usize]) -> Vec<usize> {
    let n_clusters = assignment.iter().copied().max().map_or(0, |c| c + 1);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_clusters];
    for (i, &cluster) in assignment.iter().enumerate() {
        members[cluster].push(i);
    }

    let mut representatives = Vec::with_capacity(n_clusters);
    for cluster in &members {
        let mut best = cluster[0];
        let mut best_var = f64::INFINITY;
        for &i in cluster {
            let var = intra_cluster_variance(corr, i, cluster);
            if var < best_var {
                best_var = var;
                best = i;
            }
        }
        representatives.push(best);
    }
    representatives
}

/// Population variance of row `i` of the correlation matrix over `members`.
fn intra_cluster_variance(corr: &Mat<f64>, i: usize, members: &[usize]) -> f64 {
    let n = members.len() as f64;
    let mean: f64 = members.iter().map(|&j| corr[(i, j)]).sum::<f64>() / n;
    members
        .iter()
        .map(|&j| {
            let dev = corr[(i, j)] - mean;
            dev * dev
        })
        .sum::<f64>()
        / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corr_from_rows(rows: &[&[f64]]) -> Mat<f64> {
        Mat::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j])
    }

    #[test]
    fn test_two_tight_pairs_and_two_singletons() {
        // {0,1} and {2,3} are near-duplicates, 4 and 5 are unrelated
        let corr = corr_from_rows(&[
            &[1.0, 0.95, 0.0, 0.0, 0.0, 0.0],
            &[0.95, 1.0, 0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 1.0, 0.95, 0.0, 0.0],
            &[0.0, 0.0, 0.95, 1.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        ]);

        let assignment = cluster_by_dissimilarity(&corr, 0.8);

        assert_eq!(assignment, vec![0, 0, 1, 1, 2, 3]);
    }

    #[test]
    fn test_everything_merges_at_permissive_threshold() {
        let corr = corr_from_rows(&[
            &[1.0, 0.5, 0.4],
            &[0.5, 1.0, 0.6],
            &[0.4, 0.6, 1.0],
        ]);

        // Complete-linkage merge distances stay below 1 - 0.4 = 0.6 <= 0.7
        let assignment = cluster_by_dissimilarity(&corr, 0.7);
        assert_eq!(assignment, vec![0, 0, 0]);
    }

    #[test]
    fn test_nothing_merges_at_strict_threshold() {
        let corr = corr_from_rows(&[
            &[1.0, 0.5, 0.4],
            &[0.5, 1.0, 0.6],
            &[0.4, 0.6, 1.0],
        ]);

        let assignment = cluster_by_dissimilarity(&corr, 0.1);
        assert_eq!(assignment, vec![0, 1, 2]);
    }

    #[test]
    fn test_representative_is_most_central_member() {
        // Member 0 correlates 0.9 with both others; 1 and 2 share only 0.8.
        // Row variances over the cluster: 0 is the evenest, so it wins.
        let corr = corr_from_rows(&[
            &[1.0, 0.9, 0.9],
            &[0.9, 1.0, 0.8],
            &[0.9, 0.8, 1.0],
        ]);

        let reps = cluster_representatives(&corr, &[0, 0, 0]);
        assert_eq!(reps, vec![0]);
    }

    #[test]
    fn test_representative_tie_takes_first_member() {
        // Symmetric pair: identical row variances, index order decides
        let corr = corr_from_rows(&[&[1.0, 0.9], &[0.9, 1.0]]);

        let reps = cluster_representatives(&corr, &[0, 0]);
        assert_eq!(reps, vec![0]);
    }

    #[test]
    fn test_singleton_clusters_keep_themselves() {
        let corr = corr_from_rows(&[&[1.0, 0.0], &[0.0, 1.0]]);

        let reps = cluster_representatives(&corr, &[0, 1]);
        assert_eq!(reps, vec![0, 1]);
    }
}
