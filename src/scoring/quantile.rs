//! Equal-frequency (quantile) binning.
//!
//! Edges are the `i / q` quantiles of the batch (`i = 0..=q`, linear
//! interpolation). Duplicate edges are dropped, so a tie-heavy batch yields
//! fewer than `q` effective bins rather than an error. Bins are right-closed,
//! with the first bin also including the minimum:
//!
//! ```text
//! rank 0: [e0, e1]   rank k: (e_k, e_{k+1}]
//! ```
//!
//! Because edges only depend on the multiset of values, ranks do not depend
//! on input order.

use crate::error::ScoringError;
use crate::math::sorted_quantile;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBins {
    edges: Vec<f64>,
}

impl QuantileBins {
    pub fn fit(values: &[f64], quantiles: usize) -> Result<Self, ScoringError> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ScoringError::NonFiniteScore);
        }
        let quantiles = quantiles.max(1);

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut edges: Vec<f64> = (0..=quantiles)
            .filter_map(|i| sorted_quantile(&sorted, i as f64 / quantiles as f64))
            .collect();
        edges.dedup();

        Ok(Self { edges })
    }

    /// Number of effective bins after dropping duplicate edges.
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Rank of `value` in `0..bin_count()`. Values outside the fitted range
    /// clamp to the first/last bin; a batch without spread ranks everything 0.
    pub fn rank(&self, value: f64) -> usize {
        let bins = self.bin_count();
        if bins == 0 {
            return 0;
        }
        self.edges[1..].partition_point(|&e| e < value).min(bins - 1)
    }
}

/// Rank every value of the batch against the batch's own quantile edges.
pub fn quantile_rank(values: &[f64], quantiles: usize) -> Result<Vec<usize>, ScoringError> {
    let bins = QuantileBins::fit(values, quantiles)?;
    Ok(values.iter().map(|&v| bins.rank(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_batch_fills_every_bin() {
        let values: Vec<f64> = (0..64).map(f64::from).collect();
        let ranks = quantile_rank(&values, 32).unwrap();
        assert_eq!(ranks[0], 0);
        assert_eq!(ranks[63], 31);
        for r in 0..32 {
            assert_eq!(ranks.iter().filter(|&&x| x == r).count(), 2, "bin {r}");
        }
    }

    #[test]
    fn matches_pandas_qcut_on_small_batch() {
        // pd.qcut([1, 2, 3, 4, 5], 4, labels=False) -> [0, 0, 1, 2, 3]
        let ranks = quantile_rank(&[1.0, 2.0, 3.0, 4.0, 5.0], 4).unwrap();
        assert_eq!(ranks, vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn duplicate_edges_merge_bins() {
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let bins = QuantileBins::fit(&values, 4).unwrap();
        assert!(bins.bin_count() < 4);
        let ranks: Vec<usize> = values.iter().map(|&v| bins.rank(v)).collect();
        assert!(ranks[..6].iter().all(|&r| r == 0));
        assert!(ranks[7] >= ranks[6]);
    }

    #[test]
    fn single_value_ranks_zero() {
        assert_eq!(quantile_rank(&[4.2], 32).unwrap(), vec![0]);
        assert_eq!(quantile_rank(&[3.0, 3.0, 3.0], 32).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn empty_batch_is_fine() {
        assert!(quantile_rank(&[], 32).unwrap().is_empty());
    }

    #[test]
    fn order_independent() {
        let a = [0.4, 2.0, 1.1, 9.0, 3.3, 0.1];
        let mut b = a;
        b.reverse();
        let ra = quantile_rank(&a, 3).unwrap();
        let rb = quantile_rank(&b, 3).unwrap();
        for (i, v) in a.iter().enumerate() {
            let j = b.iter().position(|x| x == v).unwrap();
            assert_eq!(ra[i], rb[j]);
        }
    }

    #[test]
    fn rejects_nan() {
        assert_eq!(quantile_rank(&[1.0, f64::NAN], 4), Err(ScoringError::NonFiniteScore));
    }
}
