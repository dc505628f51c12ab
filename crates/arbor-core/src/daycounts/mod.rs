//! Day count conventions for fixed income calculations.
//!
//! Day count conventions determine how dates are converted into year
//! fractions, which drive both coupon accrual and the time axis of the
//! pricing lattice.
//!
//! # Supported Conventions
//!
//! - [`Act365Fixed`]: Actual/365 Fixed - the lattice default; actual days
//!   over a fixed 365-day year
//! - [`Thirty360E`]: 30E/360 - Eurobond convention
//!
//! # Usage
//!
//! ```rust
//! use arbor_core::daycounts::{Act365Fixed, DayCount};
//! use arbor_core::types::Date;
//!
//! let dc = Act365Fixed;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! let days = dc.day_count(start, end);
//! let year_fraction = dc.year_fraction(start, end);
//! ```

mod act365;
mod thirty360;

pub use act365::Act365Fixed;
pub use thirty360::Thirty360E;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations provide the year fraction calculation between two dates
/// according to specific market conventions.
///
/// # Implementation Notes
///
/// - `year_fraction` returns the fraction of a year between dates as `f64`,
///   the unit every pricing routine works in
/// - `day_count` returns the number of days according to the convention
/// - Implementations must be thread-safe (`Send + Sync`)
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Can be negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates.
    ///
    /// For ACT conventions this is actual calendar days; for 30/360
    /// conventions it uses the 30-day month assumption.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
///
/// Provides runtime convention selection without boxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/365 Fixed
    #[default]
    Act365Fixed,
    /// 30E/360 (Eurobond)
    Thirty360E,
}

impl DayCountConvention {
    /// Returns the year fraction between two dates under this convention.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
        }
    }

    /// Returns the day count between two dates under this convention.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCountConvention::Act365Fixed => Act365Fixed.day_count(start, end),
            DayCountConvention::Thirty360E => Thirty360E.day_count(start, end),
        }
    }

    /// Returns the convention name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365Fixed => Act365Fixed.name(),
            DayCountConvention::Thirty360E => Thirty360E.name(),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
