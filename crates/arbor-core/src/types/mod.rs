//! Domain types for lattice-based fixed income pricing.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`Frequency`]: Coupon payment frequency

mod date;
mod frequency;

pub use date::Date;
pub use frequency::Frequency;
