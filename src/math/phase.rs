//! Phase arithmetic and the Kuramoto order parameter.
//!
//! φᵢ(t) ∈ S¹; coherence r·e^(iΘ) = (1/N)Σᵢ e^(iφᵢ).

use num_complex::Complex64;
use std::f64::consts::PI;

const TAU: f64 = 2.0 * PI;

/// Wraps a phase into `[0, 2π)`, mapping negatives correctly.
#[must_use]
pub fn wrap(phi: f64) -> f64 {
    let wrapped = phi.rem_euclid(TAU);
    // rem_euclid on exactly TAU can round back up to TAU itself.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest angular distance `a - b`, in `[-π, π]`.
///
/// Stable at the ±π boundary: computed via `atan2(sin(a-b), cos(a-b))`
/// rather than a naive subtract-and-wrap.
#[must_use]
pub fn diff(a: f64, b: f64) -> f64 {
    let delta = a - b;
    delta.sin().atan2(delta.cos())
}

/// Kuramoto order parameter `R = |Σ e^{iφᵢ}| / n`, in `[0, 1]`.
///
/// Returns 0 for empty input.
#[must_use]
pub fn coherence(phases: &[f64]) -> f64 {
    if phases.is_empty() {
        return 0.0;
    }
    let sum: Complex64 = phases.iter().map(|&phi| Complex64::from_polar(1.0, phi)).sum();
    (sum / phases.len() as f64).norm()
}

/// Weighted Kuramoto order parameter. Returns 0 if the weights sum to 0.
#[must_use]
pub fn coherence_weighted(phases: &[f64], weights: &[f64]) -> f64 {
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum == 0.0 {
        return 0.0;
    }
    let sum: Complex64 = phases
        .iter()
        .zip(weights.iter())
        .map(|(&phi, &w)| Complex64::from_polar(w, phi))
        .sum();
    (sum / weight_sum).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn wrap_handles_negatives() {
        assert_abs_diff_eq!(wrap(-0.5), TAU - 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap(TAU + 1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn wrap_of_tau_is_zero() {
        assert_abs_diff_eq!(wrap(TAU), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn diff_is_antisymmetric() {
        assert_abs_diff_eq!(diff(0.1, 0.2), -diff(0.2, 0.1), epsilon = 1e-12);
        assert_abs_diff_eq!(diff(1.0, 1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn diff_stable_across_wrap_boundary() {
        // Just past the boundary on each side; true separation is small.
        let a = 0.01;
        let b = TAU - 0.01;
        assert_abs_diff_eq!(diff(a, b), 0.02, epsilon = 1e-9);
    }

    #[test]
    fn coherence_of_identical_phases_is_one() {
        assert_abs_diff_eq!(coherence(&[1.0, 1.0, 1.0, 1.0]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn coherence_of_opposite_phases_is_zero() {
        assert_abs_diff_eq!(coherence(&[0.0, PI]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn coherence_of_empty_is_zero() {
        assert_eq!(coherence(&[]), 0.0);
    }

    #[test]
    fn coherence_weighted_zero_weights_is_zero() {
        assert_eq!(coherence_weighted(&[0.0, 1.0], &[0.0, 0.0]), 0.0);
    }

    proptest! {
        #[test]
        fn wrap_is_always_in_range(phi in -1e6f64..1e6f64) {
            let w = wrap(phi);
            prop_assert!((0.0..TAU).contains(&w));
        }

        #[test]
        fn wrap_is_idempotent(phi in -1e6f64..1e6f64) {
            let w = wrap(phi);
            prop_assert!((wrap(w) - w).abs() < 1e-9);
        }

        #[test]
        fn wrap_is_periodic(phi in -100.0f64..100.0f64, k in -5i32..5i32) {
            let a = wrap(phi);
            let b = wrap(phi + f64::from(k) * TAU);
            prop_assert!((a - b).abs() < 1e-6);
        }

        #[test]
        fn diff_is_bounded(a in -1e6f64..1e6f64, b in -1e6f64..1e6f64) {
            let d = diff(a, b);
            prop_assert!(d >= -PI - 1e-9 && d <= PI + 1e-9);
        }

        #[test]
        fn diff_magnitude_symmetric(a in -1e6f64..1e6f64, b in -1e6f64..1e6f64) {
            let d1 = diff(a, b).abs();
            let d2 = diff(b, a).abs();
            prop_assert!((d1 - d2).abs() < 1e-9);
        }

        #[test]
        fn coherence_always_in_unit_interval(phases in proptest::collection::vec(-100.0f64..100.0f64, 0..50)) {
            let r = coherence(&phases);
            prop_assert!((0.0..=1.0 + 1e-9).contains(&r));
        }
    }
}
