//! One-dimensional maximization.
//!
//! The Box–Cox parameter is found by maximizing a smooth, unimodal-in-practice
//! log-likelihood. We do it in two deterministic stages:
//!
//! 1. evaluate a coarse linear grid (in parallel) and keep the best point
//! 2. refine with golden-section search inside the neighbouring grid cells

use rayon::prelude::*;

const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Maximize `f` over `[lo, hi]` on a `steps`-point grid followed by
/// golden-section refinement. Non-finite objective values are treated as `-inf`.
///
/// Returns `(argmax, max)`.
pub fn grid_then_golden_max<F>(f: F, lo: f64, hi: f64, steps: usize, tol: f64) -> (f64, f64)
where
    F: Fn(f64) -> f64 + Sync,
{
    let steps = steps.max(3);
    let step = (hi - lo) / (steps as f64 - 1.0);
    let eval = |x: f64| {
        let v = f(x);
        if v.is_finite() { v } else { f64::NEG_INFINITY }
    };

    let (best_idx, _) = (0..steps)
        .into_par_iter()
        .map(|i| (i, eval(lo + step * i as f64)))
        .reduce(
            || (usize::MAX, f64::NEG_INFINITY),
            |a, b| {
                // Lowest index wins ties so the result does not depend on scheduling.
                if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) { b } else { a }
            },
        );
    let best_idx = if best_idx == usize::MAX { 0 } else { best_idx };

    let mut a = lo + step * best_idx.saturating_sub(1) as f64;
    let mut b = (lo + step * (best_idx + 1) as f64).min(hi);

    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = eval(c);
    let mut fd = eval(d);
    while (b - a).abs() > tol {
        if fc >= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = eval(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = eval(d);
        }
    }

    let x = 0.5 * (a + b);
    let grid_x = lo + step * best_idx as f64;
    let (fx, fg) = (eval(x), eval(grid_x));
    if fx >= fg { (x, fx) } else { (grid_x, fg) }
}
