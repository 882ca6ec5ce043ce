//! Box–Cox power transform.
//!
//! For strictly positive `x` and parameter `λ`:
//!
//! ```text
//! y = (x^λ - 1) / λ     if λ != 0
//! y = ln(x)             if λ == 0
//! ```
//!
//! `λ` is the maximum-likelihood estimate over the whole batch, so every
//! transformed value depends on the full distribution it was fitted with:
//!
//! ```text
//! llf(λ) = (λ - 1) Σ ln x_i - n/2 · ln(var(y(λ)))
//! ```
//!
//! Numerical notes:
//! - `(x^λ - 1) / λ` is evaluated as `expm1(λ ln x) / λ`, which stays accurate
//!   as `λ → 0` and converges to `ln x`.
//! - A batch with fewer than two distinct values has zero variance at every `λ`;
//!   we fix `λ = 1` (a shift by -1) instead of failing.
//! - The search is bounded to `[LAMBDA_MIN, LAMBDA_MAX]`. An unbounded
//!   optimizer can land outside it on strongly skewed batches; here the
//!   estimate then sits on the nearest bound.

use nalgebra::DVector;
use tracing::{debug, warn};

use crate::error::ScoringError;
use crate::math::{distinct_count, grid_then_golden_max, population_variance};

/// Search interval for `λ`. Word-score batches fit well inside it.
pub const LAMBDA_MIN: f64 = -5.0;
pub const LAMBDA_MAX: f64 = 5.0;

/// Coarse grid size before golden-section refinement.
const LAMBDA_GRID_STEPS: usize = 201;

const LAMBDA_TOL: f64 = 1e-8;

/// `λ` used when the batch has no spread to fit.
pub const DEGENERATE_LAMBDA: f64 = 1.0;

/// A fitted transform and the transformed batch (same order as the input).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCoxFit {
    pub lambda: f64,
    pub values: Vec<f64>,
}

/// Result of the exclusion policy: non-positive scores are left out of the fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialBoxCox {
    /// `None` when every score was excluded.
    pub lambda: Option<f64>,
    /// `None` at positions whose score was excluded.
    pub values: Vec<Option<f64>>,
    pub excluded: usize,
}

/// Apply the transform for a given `λ`.
pub fn box_cox(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < 1e-12 {
        x.ln()
    } else {
        (lambda * x.ln()).exp_m1() / lambda
    }
}

/// Profile log-likelihood of `λ` for strictly positive `data`.
pub fn box_cox_log_likelihood(data: &[f64], lambda: f64) -> f64 {
    let n = data.len() as f64;
    let log_sum: f64 = data.iter().map(|x| x.ln()).sum();
    let transformed = DVector::from_iterator(data.len(), data.iter().map(|&x| box_cox(x, lambda)));
    let Some(var) = population_variance(&transformed) else {
        return f64::NEG_INFINITY;
    };
    if !(var.is_finite() && var > 0.0) {
        return f64::NEG_INFINITY;
    }
    (lambda - 1.0) * log_sum - 0.5 * n * var.ln()
}

/// Fit `λ` by maximum likelihood and transform the batch.
///
/// Fails with `InvalidScoreDomain` if any value is `<= 0`.
pub fn normalize(raw_scores: &[f64]) -> Result<BoxCoxFit, ScoringError> {
    for &v in raw_scores {
        if !v.is_finite() {
            return Err(ScoringError::NonFiniteScore);
        }
        if v <= 0.0 {
            return Err(ScoringError::InvalidScoreDomain { value: v });
        }
    }

    let lambda = if distinct_count(raw_scores) < 2 {
        DEGENERATE_LAMBDA
    } else {
        let (lambda, llf) = grid_then_golden_max(
            |l| box_cox_log_likelihood(raw_scores, l),
            LAMBDA_MIN,
            LAMBDA_MAX,
            LAMBDA_GRID_STEPS,
            LAMBDA_TOL,
        );
        debug!(lambda, llf, n = raw_scores.len(), "Fitted Box-Cox lambda");
        lambda
    };

    let values = raw_scores.iter().map(|&x| box_cox(x, lambda)).collect();
    Ok(BoxCoxFit { lambda, values })
}

/// Fit on the strictly positive scores only; the rest map to `None`.
pub fn normalize_excluding_non_positive(raw_scores: &[f64]) -> Result<PartialBoxCox, ScoringError> {
    if raw_scores.iter().any(|v| !v.is_finite()) {
        return Err(ScoringError::NonFiniteScore);
    }

    let positive: Vec<f64> = raw_scores.iter().copied().filter(|&v| v > 0.0).collect();
    let excluded = raw_scores.len() - positive.len();
    if excluded > 0 {
        warn!(excluded, "Excluding non-positive scores from the power transform");
    }

    if positive.is_empty() {
        return Ok(PartialBoxCox {
            lambda: None,
            values: vec![None; raw_scores.len()],
            excluded,
        });
    }

    let fit = normalize(&positive)?;
    let mut fitted = fit.values.into_iter();
    let values = raw_scores
        .iter()
        .map(|&v| if v > 0.0 { fitted.next() } else { None })
        .collect();

    Ok(PartialBoxCox {
        lambda: Some(fit.lambda),
        values,
        excluded,
    })
}
