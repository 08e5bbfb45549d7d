//! Log-domain weight helpers
//!
//! Global hypothesis weights are kept as natural logarithms. These helpers
//! normalise them without leaving the log domain.

use nalgebra::RealField;
use num_traits::Float;

/// Computes `ln(sum(exp(w)))` without overflow.
///
/// Returns negative infinity for an empty slice or when every weight is
/// negative infinity.
pub fn log_sum_exp<T: RealField + Float + Copy>(log_weights: &[T]) -> T {
    let max_log = log_weights
        .iter()
        .copied()
        .fold(Float::neg_infinity(), |a: T, b| if b > a { b } else { a });

    if !Float::is_finite(max_log) {
        return max_log;
    }

    let sum = log_weights
        .iter()
        .fold(T::zero(), |acc, &w| acc + Float::exp(w - max_log));
    max_log + Float::ln(sum)
}

/// Normalises log-weights in place so their linear sum is one.
///
/// Returns the log of the previous linear sum. Weights are left untouched if
/// that sum is zero or not finite.
pub fn normalize_log_weights<T: RealField + Float + Copy>(log_weights: &mut [T]) -> T {
    let total = log_sum_exp(log_weights);
    if Float::is_finite(total) {
        for w in log_weights.iter_mut() {
            *w -= total;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sum_exp_matches_direct_sum() {
        let w = [0.1_f64.ln(), 0.2_f64.ln(), 0.3_f64.ln()];
        assert!((log_sum_exp(&w) - 0.6_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_sum_exp_large_magnitudes() {
        let w = [-1000.0_f64, -1000.0];
        assert!((log_sum_exp(&w) - (-1000.0 + 2.0_f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_log_sum_exp_empty() {
        assert_eq!(log_sum_exp::<f64>(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_normalize_log_weights() {
        let mut w = [1.0_f64, 2.0, 3.0];
        normalize_log_weights(&mut w);

        let linear: f64 = w.iter().map(|x| x.exp()).sum();
        assert!((linear - 1.0).abs() < 1e-12);
        assert!(log_sum_exp(&w).abs() < 1e-12);
        // Ratios are preserved
        assert!(((w[2] - w[1]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_all_zero_weight_untouched() {
        let mut w = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        let total = normalize_log_weights(&mut w);
        assert_eq!(total, f64::NEG_INFINITY);
        assert_eq!(w, [f64::NEG_INFINITY, f64::NEG_INFINITY]);
    }
}
