//! Interpolation methods for discount curves.
//!
//! The curve stores discount factor pillars; queries at arbitrary times go
//! through [`interpolate_discount_factor`]. Flat-forward interpolation
//! (piecewise-constant instantaneous forward rates, i.e. log-linear in the
//! discount factors) is the default, matching standard market practice for
//! lattice calibration inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CurveError, CurveResult};

/// Interpolation methods for discount curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Flat forward rates: log-linear interpolation on discount factors.
    #[default]
    FlatForward,

    /// Linear interpolation on continuously compounded zero rates.
    LinearZero,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FlatForward => "Flat Forward",
            Self::LinearZero => "Linear (Zero Rates)",
        };
        write!(f, "{name}")
    }
}

/// Interpolates a discount factor at time `t` from pillar arrays.
///
/// `times` must be strictly ascending with `times[0] == 0.0` and
/// `factors[0] == 1.0` (the curve constructor guarantees this). Queries
/// beyond the last pillar extrapolate by continuing the last segment's
/// forward rate (flat forward) or holding the last zero rate (linear zero).
///
/// # Errors
///
/// Returns [`CurveError::NegativeTime`] for `t < 0` and
/// [`CurveError::InterpolationError`] if fewer than two pillars are present.
pub fn interpolate_discount_factor(
    t: f64,
    times: &[f64],
    factors: &[f64],
    method: InterpolationMethod,
) -> CurveResult<f64> {
    if t < 0.0 {
        return Err(CurveError::NegativeTime { time: t });
    }
    if times.len() < 2 || times.len() != factors.len() {
        return Err(CurveError::interpolation(
            "at least two pillars are required",
        ));
    }
    if t == 0.0 {
        return Ok(1.0);
    }

    let n = times.len();

    // Bracketing segment; queries past the last pillar reuse the final
    // segment, which extrapolates its forward rate.
    let hi = match times.iter().position(|&pt| pt >= t) {
        Some(0) => 1,
        Some(i) => i,
        None => n - 1,
    };
    let lo = hi - 1;

    let (t0, t1) = (times[lo], times[hi]);
    let (f0, f1) = (factors[lo], factors[hi]);

    match method {
        InterpolationMethod::FlatForward => {
            let w = (t - t0) / (t1 - t0);
            Ok((f0.ln() + w * (f1.ln() - f0.ln())).exp())
        }
        InterpolationMethod::LinearZero => {
            // Zero rate at the origin pillar is taken from the first
            // positive pillar; -ln(1)/0 is indeterminate.
            let r0 = if t0 == 0.0 {
                -f1.ln() / t1
            } else {
                -f0.ln() / t0
            };
            let r1 = -f1.ln() / t1;

            let r = if t >= t1 {
                r1
            } else {
                r0 + (t - t0) / (t1 - t0) * (r1 - r0)
            };
            Ok((-r * t).exp())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_pillars(rate: f64) -> (Vec<f64>, Vec<f64>) {
        let times = vec![0.0, 1.0, 5.0, 10.0];
        let factors = times.iter().map(|t| (-rate * t).exp()).collect();
        (times, factors)
    }

    #[test]
    fn test_flat_forward_recovers_flat_curve() {
        let (times, factors) = flat_pillars(0.03);

        for &t in &[0.25, 1.0, 2.5, 7.0] {
            let df =
                interpolate_discount_factor(t, &times, &factors, InterpolationMethod::FlatForward)
                    .unwrap();
            assert_relative_eq!(df, (-0.03 * t).exp(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_extrapolation_continues_last_forward() {
        let (times, factors) = flat_pillars(0.03);

        let df =
            interpolate_discount_factor(15.0, &times, &factors, InterpolationMethod::FlatForward)
                .unwrap();
        assert_relative_eq!(df, (-0.03 * 15.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_linear_zero_recovers_flat_curve() {
        let (times, factors) = flat_pillars(0.04);

        let df =
            interpolate_discount_factor(3.0, &times, &factors, InterpolationMethod::LinearZero)
                .unwrap();
        assert_relative_eq!(df, (-0.04 * 3.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_time_zero_is_unity() {
        let (times, factors) = flat_pillars(0.03);
        let df =
            interpolate_discount_factor(0.0, &times, &factors, InterpolationMethod::FlatForward)
                .unwrap();
        assert_eq!(df, 1.0);
    }

    #[test]
    fn test_negative_time_fails() {
        let (times, factors) = flat_pillars(0.03);
        let err =
            interpolate_discount_factor(-0.5, &times, &factors, InterpolationMethod::FlatForward)
                .unwrap_err();
        assert!(matches!(err, CurveError::NegativeTime { .. }));
    }
}
