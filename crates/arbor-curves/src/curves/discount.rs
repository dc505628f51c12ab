//! Discount factor curve.

use arbor_core::daycounts::DayCountConvention;
use arbor_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::{interpolate_discount_factor, InterpolationMethod};

/// A discount factor curve anchored at a reference date.
///
/// The curve stores pillar times (year fractions from the reference date)
/// with their discount factors, and answers queries at arbitrary
/// non-negative times by interpolation. Dates are converted to times with
/// the curve's day count convention.
///
/// The curve is immutable once constructed and is shared read-only by the
/// lattice builder and every pricer.
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    times: Vec<f64>,
    factors: Vec<f64>,
    method: InterpolationMethod,
}

impl DiscountCurve {
    /// Creates a curve from pillar times and discount factors.
    ///
    /// Pillar times must be strictly ascending and non-negative; discount
    /// factors must lie in `(0, 1]`. A unit pillar at `t = 0` is prepended
    /// when not supplied.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ConstructionFailed`] when the pillars are
    /// empty, unsorted, or carry non-positive discount factors.
    pub fn from_discount_factors(
        reference_date: Date,
        day_count: DayCountConvention,
        times: &[f64],
        factors: &[f64],
        method: InterpolationMethod,
    ) -> CurveResult<Self> {
        if times.is_empty() || times.len() != factors.len() {
            return Err(CurveError::construction_failed(
                "pillar times and factors must be non-empty and equal length",
            ));
        }

        let mut full_times = Vec::with_capacity(times.len() + 1);
        let mut full_factors = Vec::with_capacity(factors.len() + 1);
        if times[0] > 0.0 {
            full_times.push(0.0);
            full_factors.push(1.0);
        }
        full_times.extend_from_slice(times);
        full_factors.extend_from_slice(factors);

        for window in full_times.windows(2) {
            if window[1] <= window[0] {
                return Err(CurveError::construction_failed(
                    "pillar times must be strictly ascending",
                ));
            }
        }
        if full_times[0] < 0.0 {
            return Err(CurveError::construction_failed(
                "pillar times must be non-negative",
            ));
        }
        for &df in &full_factors {
            if df <= 0.0 || df > 1.0 + 1e-12 {
                return Err(CurveError::construction_failed(format!(
                    "discount factor {df} outside (0, 1]"
                )));
            }
        }
        if full_times.len() < 2 {
            return Err(CurveError::construction_failed(
                "at least one positive pillar is required",
            ));
        }

        Ok(Self {
            reference_date,
            day_count,
            times: full_times,
            factors: full_factors,
            method,
        })
    }

    /// Creates a flat curve at a continuously compounded zero rate.
    ///
    /// The flat-forward interpolation reproduces `exp(-rate * t)` exactly at
    /// every query time, including extrapolated ones.
    #[must_use]
    pub fn flat(reference_date: Date, rate: f64) -> Self {
        let times = vec![0.0, 1.0, 50.0];
        let factors = times.iter().map(|t| (-rate * t).exp()).collect();
        Self {
            reference_date,
            day_count: DayCountConvention::Act365Fixed,
            times,
            factors,
            method: InterpolationMethod::FlatForward,
        }
    }

    /// Returns the reference date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Returns the curve's day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the year fraction from the reference date to `date` under
    /// the curve's day count convention.
    #[must_use]
    pub fn time_of(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.reference_date, date)
    }

    /// Returns the discount factor at year fraction `t >= 0`.
    ///
    /// Defined at arbitrary times, including off-pillar points, by the
    /// curve's interpolation method.
    pub fn discount_factor_at(&self, t: f64) -> CurveResult<f64> {
        interpolate_discount_factor(t, &self.times, &self.factors, self.method)
    }

    /// Returns the discount factor for a date.
    pub fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor_at(self.time_of(date))
    }

    /// Returns the continuously compounded zero rate at `t > 0`.
    pub fn zero_rate_at(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Err(CurveError::ZeroRateUndefined { time: t });
        }
        let df = self.discount_factor_at(t)?;
        Ok(-df.ln() / t)
    }

    /// Returns the forward discount factor between `t1` and `t2`.
    ///
    /// Forward DF = DF(t2) / DF(t1).
    pub fn forward_discount_factor(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        let df1 = self.discount_factor_at(t1)?;
        let df2 = self.discount_factor_at(t2)?;
        Ok(df2 / df1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ref_date() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_flat_curve() {
        let curve = DiscountCurve::flat(ref_date(), 0.03);

        assert_eq!(curve.discount_factor_at(0.0).unwrap(), 1.0);
        assert_relative_eq!(
            curve.discount_factor_at(5.0).unwrap(),
            (-0.15f64).exp(),
            epsilon = 1e-12
        );
        assert_relative_eq!(curve.zero_rate_at(7.0).unwrap(), 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_from_discount_factors_prepends_unit_pillar() {
        let curve = DiscountCurve::from_discount_factors(
            ref_date(),
            DayCountConvention::Act365Fixed,
            &[1.0, 2.0, 5.0],
            &[0.97, 0.94, 0.86],
            InterpolationMethod::FlatForward,
        )
        .unwrap();

        assert_eq!(curve.discount_factor_at(0.0).unwrap(), 1.0);
        assert_relative_eq!(curve.discount_factor_at(2.0).unwrap(), 0.94, epsilon = 1e-12);
    }

    #[test]
    fn test_construction_rejects_unsorted_pillars() {
        let err = DiscountCurve::from_discount_factors(
            ref_date(),
            DayCountConvention::Act365Fixed,
            &[2.0, 1.0],
            &[0.94, 0.97],
            InterpolationMethod::FlatForward,
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::ConstructionFailed { .. }));
    }

    #[test]
    fn test_construction_rejects_bad_factors() {
        let err = DiscountCurve::from_discount_factors(
            ref_date(),
            DayCountConvention::Act365Fixed,
            &[1.0, 2.0],
            &[0.97, -0.5],
            InterpolationMethod::FlatForward,
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::ConstructionFailed { .. }));
    }

    #[test]
    fn test_discount_factor_by_date() {
        let curve = DiscountCurve::flat(ref_date(), 0.03);
        let date = Date::from_ymd(2026, 1, 1).unwrap();

        let t = curve.time_of(date);
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            curve.discount_factor(date).unwrap(),
            (-0.03f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_forward_discount_factor() {
        let curve = DiscountCurve::flat(ref_date(), 0.03);
        let fwd = curve.forward_discount_factor(1.0, 2.0).unwrap();
        assert_relative_eq!(fwd, (-0.03f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_time_fails() {
        let curve = DiscountCurve::flat(ref_date(), 0.03);
        assert!(curve.discount_factor_at(-1.0).is_err());
    }
}
