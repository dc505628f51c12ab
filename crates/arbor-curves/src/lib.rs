//! # Arbor Curves
//!
//! Discount curve container and interpolation for the Arbor lattice pricing
//! library.
//!
//! The central type is [`DiscountCurve`]: a set of pillar times and discount
//! factors anchored at a reference date, queryable at arbitrary non-negative
//! year fractions through an [`InterpolationMethod`]. The lattice calibration
//! and every pricer consume curves exclusively through
//! [`DiscountCurve::discount_factor_at`], including off-pillar points used
//! for cash-flow scaling.
//!
//! ## Example
//!
//! ```rust
//! use arbor_core::types::Date;
//! use arbor_curves::DiscountCurve;
//!
//! // Flat 3% continuously compounded curve
//! let curve = DiscountCurve::flat(Date::from_ymd(2025, 1, 1).unwrap(), 0.03);
//!
//! let df = curve.discount_factor_at(2.0).unwrap();
//! assert!((df - (-0.06f64).exp()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod curves;
pub mod error;
pub mod interpolation;

pub use curves::DiscountCurve;
pub use error::{CurveError, CurveResult};
pub use interpolation::InterpolationMethod;
