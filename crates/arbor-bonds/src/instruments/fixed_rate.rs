//! Fixed rate bond implementation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use arbor_core::daycounts::DayCountConvention;
use arbor_core::types::{Date, Frequency};

use crate::error::{BondError, BondResult};

/// A fixed rate coupon bond.
///
/// The bond is specified by its annual coupon rate, payment frequency, and
/// maturity date. Coupon dates are generated backward from maturity in
/// regular `months_per_period` strides, so the maturity date anchors the
/// schedule.
///
/// # Example
///
/// ```rust
/// use arbor_bonds::instruments::FixedRateBond;
/// use arbor_core::types::{Date, Frequency};
/// use rust_decimal_macros::dec;
///
/// let maturity = Date::from_ymd(2030, 1, 1).unwrap();
/// let bond = FixedRateBond::new(dec!(0.05), Frequency::SemiAnnual, maturity).unwrap();
///
/// assert!((bond.coupon_per_period_f64() - 0.025).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FixedRateBond {
    /// Annual coupon rate as a decimal (0.05 for 5%).
    coupon_rate: Decimal,
    /// Coupon payment frequency.
    frequency: Frequency,
    /// Maturity date.
    maturity_date: Date,
    /// Day count convention for accrual.
    day_count: DayCountConvention,
}

impl FixedRateBond {
    /// Creates a new fixed rate bond.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidSpec`] if the coupon rate is negative or
    /// a non-zero coupon is paired with `Frequency::Zero`.
    pub fn new(
        coupon_rate: Decimal,
        frequency: Frequency,
        maturity_date: Date,
    ) -> BondResult<Self> {
        if coupon_rate < Decimal::ZERO {
            return Err(BondError::invalid_spec("coupon rate must be non-negative"));
        }
        if frequency.is_zero() && coupon_rate > Decimal::ZERO {
            return Err(BondError::invalid_spec(
                "zero-coupon frequency requires a zero coupon rate",
            ));
        }

        Ok(Self {
            coupon_rate,
            frequency,
            maturity_date,
            day_count: DayCountConvention::Act365Fixed,
        })
    }

    /// Creates a zero-coupon bond maturing on the given date.
    pub fn zero_coupon(maturity_date: Date) -> BondResult<Self> {
        Self::new(Decimal::ZERO, Frequency::Zero, maturity_date)
    }

    /// Sets the day count convention for accrual.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Returns the annual coupon rate as a decimal.
    #[must_use]
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Returns the annual coupon rate as `f64` for the pricing boundary.
    #[must_use]
    pub fn coupon_rate_f64(&self) -> f64 {
        self.coupon_rate.to_f64().unwrap_or(0.0)
    }

    /// Returns the coupon amount per period per unit of face value, as `f64`.
    #[must_use]
    pub fn coupon_per_period_f64(&self) -> f64 {
        let periods = self.frequency.periods_per_year();
        if periods == 0 {
            0.0
        } else {
            self.coupon_rate_f64() / f64::from(periods)
        }
    }

    /// Returns the payment frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the maturity date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Returns the accrual day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Materializes the bond's flow dates as seen from `as_of`.
    ///
    /// Returns an ascending sequence of dates. The first entry is the
    /// coupon date on or before `as_of` (or `as_of` itself when no earlier
    /// coupon exists) and is excluded from coupon accrual by consumers; the
    /// remaining entries are the coupon dates strictly after `as_of`
    /// through maturity. A zero-coupon bond yields `[as_of, maturity]`.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidSpec`] if `as_of` is not before maturity.
    pub fn flow_dates(&self, as_of: Date) -> BondResult<Vec<Date>> {
        if as_of >= self.maturity_date {
            return Err(BondError::invalid_spec(
                "as-of date must be before maturity",
            ));
        }

        if self.frequency.is_zero() {
            return Ok(vec![as_of, self.maturity_date]);
        }

        let months = self.frequency.months_per_period() as i32;

        // Generate backward from maturity; the first date on or before
        // as_of becomes the accrual anchor.
        let mut dates = vec![self.maturity_date];
        let mut stride = months;
        loop {
            let date = self.maturity_date.add_months(-stride)?;
            dates.push(date);
            if date <= as_of {
                break;
            }
            stride += months;
        }

        dates.reverse();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn five_year_semi() -> FixedRateBond {
        let maturity = Date::from_ymd(2030, 1, 1).unwrap();
        FixedRateBond::new(dec!(0.05), Frequency::SemiAnnual, maturity).unwrap()
    }

    #[test]
    fn test_construction_validates_coupon() {
        let maturity = Date::from_ymd(2030, 1, 1).unwrap();
        assert!(FixedRateBond::new(dec!(-0.01), Frequency::Annual, maturity).is_err());
        assert!(FixedRateBond::new(dec!(0.05), Frequency::Zero, maturity).is_err());
    }

    #[test]
    fn test_coupon_per_period() {
        let bond = five_year_semi();
        assert!((bond.coupon_per_period_f64() - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_flow_dates_regular() {
        let bond = five_year_semi();
        let as_of = Date::from_ymd(2025, 1, 1).unwrap();

        let dates = bond.flow_dates(as_of).unwrap();

        // Anchor + 10 semi-annual coupons
        assert_eq!(dates.len(), 11);
        assert_eq!(dates[0], as_of);
        assert_eq!(dates[1], Date::from_ymd(2025, 7, 1).unwrap());
        assert_eq!(*dates.last().unwrap(), bond.maturity_date());
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_flow_dates_mid_period_anchor() {
        let bond = five_year_semi();
        let as_of = Date::from_ymd(2025, 3, 15).unwrap();

        let dates = bond.flow_dates(as_of).unwrap();

        // First entry is the previous coupon date, before as_of
        assert_eq!(dates[0], Date::from_ymd(2025, 1, 1).unwrap());
        assert_eq!(dates[1], Date::from_ymd(2025, 7, 1).unwrap());
    }

    #[test]
    fn test_flow_dates_zero_coupon() {
        let maturity = Date::from_ymd(2030, 1, 1).unwrap();
        let bond = FixedRateBond::zero_coupon(maturity).unwrap();
        let as_of = Date::from_ymd(2025, 1, 1).unwrap();

        let dates = bond.flow_dates(as_of).unwrap();
        assert_eq!(dates, vec![as_of, maturity]);
    }

    #[test]
    fn test_flow_dates_rejects_matured_bond() {
        let bond = five_year_semi();
        let late = Date::from_ymd(2031, 1, 1).unwrap();
        assert!(bond.flow_dates(late).is_err());
    }
}
