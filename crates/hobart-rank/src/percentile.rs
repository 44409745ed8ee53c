//! Minimum-tie percentile ranking.
//!
//! The percentile of a value is the fraction of the ranked population it
//! is greater than or equal to; tied values all receive the percentile of
//! the lowest-ranked member of the tie block. Missing and non-finite
//! values are excluded from the population and stay missing in the
//! output.

use std::collections::HashMap;

fn rank_impl(values: &[Option<f64>], descending: bool) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| value.filter(|v| v.is_finite()).map(|v| (idx, v)))
        .collect();
    let population = present.len();
    if population == 0 {
        return out;
    }
    present.sort_by(|a, b| {
        let ord = a.1.total_cmp(&b.1);
        if descending { ord.reverse() } else { ord }
    });

    let mut start = 0;
    while start < population {
        let mut end = start + 1;
        while end < population && present[end].1 == present[start].1 {
            end += 1;
        }
        // The whole tie block takes the minimum rank of the block.
        let percentile = (start + 1) as f64 / population as f64;
        for &(idx, _) in &present[start..end] {
            out[idx] = Some(percentile);
        }
        start = end;
    }
    out
}

/// Percentile-rank values ascending (larger value, higher percentile).
///
/// # Examples
///
/// ```
/// use hobart_rank::pct_rank_min;
///
/// let ranks = pct_rank_min(&[Some(10.0), Some(10.0), Some(20.0), None]);
/// assert_eq!(ranks, vec![
///     Some(1.0 / 3.0),
///     Some(1.0 / 3.0),
///     Some(1.0),
///     None,
/// ]);
/// ```
pub fn pct_rank_min(values: &[Option<f64>]) -> Vec<Option<f64>> {
    rank_impl(values, false)
}

/// Percentile-rank values descending (smaller value, higher percentile).
///
/// Equivalent to negating every value and ranking ascending; both forms
/// exist so either convention can express "lower is better".
pub fn pct_rank_min_descending(values: &[Option<f64>]) -> Vec<Option<f64>> {
    rank_impl(values, true)
}

/// Peer-group percentile ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRanks {
    /// Per-row percentile within the row's group; missing where the value
    /// is missing or the row has no group label.
    pub ranks: Vec<Option<f64>>,
    /// Per-row size of the row's ranked population (finite values in the
    /// row's group; 0 for unlabeled rows).
    pub group_sizes: Vec<usize>,
}

/// Percentile-rank values ascending within groups.
///
/// Rows with no group label receive no peer rank and a group size of 0.
///
/// # Panics
///
/// Panics if `values` and `groups` differ in length.
pub fn pct_rank_min_grouped(values: &[Option<f64>], groups: &[Option<&str>]) -> GroupedRanks {
    assert_eq!(
        values.len(),
        groups.len(),
        "values and groups must be parallel"
    );

    let mut members: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, group) in groups.iter().enumerate() {
        if let Some(label) = group {
            members.entry(label).or_default().push(idx);
        }
    }

    let mut ranks = vec![None; values.len()];
    let mut group_sizes = vec![0usize; values.len()];
    for indices in members.values() {
        let group_values: Vec<Option<f64>> = indices.iter().map(|&idx| values[idx]).collect();
        let group_ranks = pct_rank_min(&group_values);
        let population = group_ranks.iter().flatten().count();
        for (at, &idx) in indices.iter().enumerate() {
            ranks[idx] = group_ranks[at];
            group_sizes[idx] = population;
        }
    }
    GroupedRanks { ranks, group_sizes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_basic_ascending() {
        let ranks = pct_rank_min(&[Some(3.0), Some(1.0), Some(2.0)]);
        assert_eq!(
            ranks,
            vec![Some(1.0), Some(1.0 / 3.0), Some(2.0 / 3.0)]
        );
    }

    #[test]
    fn test_ties_share_lowest_percentile() {
        // Two-way tie at the bottom of a population of four.
        let ranks = pct_rank_min(&[Some(1.0), Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(ranks[0], Some(0.25));
        assert_eq!(ranks[1], Some(0.25));
        assert_eq!(ranks[2], Some(0.75));
        assert_eq!(ranks[3], Some(1.0));
    }

    #[test]
    fn test_maximum_gets_full_percentile() {
        let ranks = pct_rank_min(&[Some(5.0), Some(7.0)]);
        assert_eq!(ranks, vec![Some(0.5), Some(1.0)]);
    }

    #[test]
    fn test_missing_excluded_from_population() {
        let ranks = pct_rank_min(&[Some(1.0), None, Some(2.0)]);
        assert_eq!(ranks, vec![Some(0.5), None, Some(1.0)]);
    }

    #[test]
    fn test_non_finite_treated_as_missing() {
        let ranks = pct_rank_min(&[Some(1.0), Some(f64::NAN), Some(f64::INFINITY), Some(2.0)]);
        assert_eq!(ranks[1], None);
        assert_eq!(ranks[2], None);
        assert_eq!(ranks[0], Some(0.5));
        assert_eq!(ranks[3], Some(1.0));
    }

    #[test]
    fn test_empty_and_all_missing() {
        assert!(pct_rank_min(&[]).is_empty());
        assert_eq!(pct_rank_min(&[None, None]), vec![None, None]);
    }

    #[test]
    fn test_singleton_ranks_full() {
        assert_eq!(pct_rank_min(&[Some(42.0)]), vec![Some(1.0)]);
    }

    #[test]
    fn test_percentiles_bounded() {
        let values: Vec<Option<f64>> = (0..50).map(|v| Some(f64::from(v) * 0.7 - 3.0)).collect();
        for rank in pct_rank_min(&values).into_iter().flatten() {
            assert!(rank > 0.0 && rank <= 1.0);
        }
    }

    #[test]
    fn test_negation_equals_descending() {
        // Sign-convention invariant: ranking negated values ascending must
        // match ranking the original values descending.
        let values = vec![Some(0.4), Some(-1.2), None, Some(0.4), Some(3.3)];
        let negated: Vec<Option<f64>> = values.iter().map(|v| v.map(|x| -x)).collect();
        assert_eq!(pct_rank_min(&negated), pct_rank_min_descending(&values));
    }

    #[test]
    fn test_reranking_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<Option<f64>> = (0..200)
            .map(|_| {
                if rng.gen_bool(0.1) {
                    None
                } else {
                    // Coarse grid to force ties.
                    Some((rng.gen_range(-10i32..10) as f64) / 4.0)
                }
            })
            .collect();
        let once = pct_rank_min(&values);
        let twice = pct_rank_min(&once);
        for (a, b) in once.iter().zip(twice.iter()) {
            match (a, b) {
                (Some(x), Some(y)) => assert_relative_eq!(x, y),
                (None, None) => {}
                _ => panic!("missingness changed under re-ranking"),
            }
        }
    }

    #[test]
    fn test_grouped_ranks() {
        let values = [Some(0.10), Some(0.20), Some(0.05)];
        let groups = [Some("Tech"), Some("Tech"), Some("Energy")];
        let grouped = pct_rank_min_grouped(&values, &groups);

        assert_eq!(grouped.ranks, vec![Some(0.5), Some(1.0), Some(1.0)]);
        assert_eq!(grouped.group_sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_grouped_unlabeled_rows() {
        let values = [Some(1.0), Some(2.0)];
        let groups = [None, Some("Tech")];
        let grouped = pct_rank_min_grouped(&values, &groups);

        assert_eq!(grouped.ranks, vec![None, Some(1.0)]);
        assert_eq!(grouped.group_sizes, vec![0, 1]);
    }

    #[test]
    fn test_grouped_missing_value_shrinks_population() {
        let values = [Some(1.0), None, Some(2.0)];
        let groups = [Some("Tech"), Some("Tech"), Some("Tech")];
        let grouped = pct_rank_min_grouped(&values, &groups);

        assert_eq!(grouped.ranks, vec![Some(0.5), None, Some(1.0)]);
        // Population counts finite values only, for every member row.
        assert_eq!(grouped.group_sizes, vec![2, 2, 2]);
    }
}
