//! Curve containers.

mod discount;

pub use discount::DiscountCurve;
