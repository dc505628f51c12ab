//! 30E/360 (Eurobond) day count convention.

use super::DayCount;
use crate::types::Date;

/// 30E/360 day count convention (Eurobond basis).
///
/// Both the start and end day-of-month are capped at 30; every month is
/// treated as 30 days over a 360-day year.
///
/// # Formula
///
/// Days = 360*(Y2-Y1) + 30*(M2-M1) + (D2-D1), with D1 = min(D1, 30) and
/// D2 = min(D2, 30). Year Fraction = Days / 360.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = start.day().min(30) as i64;
        let d2 = end.day().min(30) as i64;

        360 * (end.year() as i64 - start.year() as i64)
            + 30 * (end.month() as i64 - start.month() as i64)
            + (d2 - d1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_period() {
        let dc = Thirty360E;
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2025, 7, 15).unwrap();

        assert_eq!(dc.day_count(start, end), 180);
        assert!((dc.year_fraction(start, end) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_31st_capped() {
        let dc = Thirty360E;
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 3, 31).unwrap();

        // Both ends treated as the 30th
        assert_eq!(dc.day_count(start, end), 60);
    }

    #[test]
    fn test_full_year() {
        let dc = Thirty360E;
        let start = Date::from_ymd(2025, 6, 15).unwrap();
        let end = Date::from_ymd(2026, 6, 15).unwrap();

        assert!((dc.year_fraction(start, end) - 1.0).abs() < 1e-12);
    }
}
