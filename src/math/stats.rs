//! Descriptive statistics over `nalgebra` vectors.
//!
//! All functions return `None` on empty input instead of producing NaN, so
//! callers have to decide what an empty batch means for them.

use nalgebra::DVector;

/// Arithmetic mean.
pub fn mean(values: &DVector<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Population variance (divides by `n`, not `n - 1`).
pub fn population_variance(values: &DVector<f64>) -> Option<f64> {
    let m = mean(values)?;
    let sq = values.map(|v| (v - m) * (v - m));
    Some(sq.mean())
}

/// Number of distinct values (exact float equality).
pub fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// Linear-interpolated quantile of already-sorted data, `q` in `[0, 1]`.
///
/// Matches the default ("linear") method of numpy/pandas.
pub fn sorted_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_variance_basic() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert!((mean(&v).unwrap() - 2.5).abs() < 1e-12);
        assert!((population_variance(&v).unwrap() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn empty_input_has_no_mean() {
        let v = DVector::<f64>::from_vec(vec![]);
        assert!(mean(&v).is_none());
        assert!(population_variance(&v).is_none());
    }

    #[test]
    fn quantile_interpolates_between_points() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sorted_quantile(&data, 0.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((sorted_quantile(&data, 0.5).unwrap() - 3.0).abs() < 1e-12);
        assert!((sorted_quantile(&data, 0.1).unwrap() - 1.4).abs() < 1e-12);
        assert!((sorted_quantile(&data, 1.0).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distinct_count_ignores_duplicates() {
        assert_eq!(distinct_count(&[1.0, 1.0, 2.0, 3.0, 3.0]), 3);
        assert_eq!(distinct_count(&[]), 0);
    }
}
