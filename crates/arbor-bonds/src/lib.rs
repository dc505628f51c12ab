//! # Arbor Bonds
//!
//! Bond instruments and interest-rate option pricing for the Arbor fixed
//! income library.
//!
//! This crate provides:
//!
//! - **Instruments**: [`instruments::FixedRateBond`] with backward-generated
//!   coupon schedules
//! - **Options**: the Hull-White one-factor short rate model, the calibrated
//!   trinomial lattice it builds, and the analytic and lattice-based pricers
//!   for options on zero-coupon and coupon bonds
//!
//! # Overview
//!
//! The pricing workflow is: construct a [`options::HullWhite`] model, build
//! an immutable [`options::HullWhiteLattice`] calibrated to a discount
//! curve, then feed the lattice to the stateless pricing functions in
//! [`options`]. The lattice is built once per
//! `(parameters, curve, horizon, steps)` tuple and consumed read-only by
//! every pricer.
//!
//! # Example
//!
//! ```rust
//! use arbor_bonds::options::HullWhite;
//! use arbor_core::types::Date;
//! use arbor_curves::DiscountCurve;
//!
//! let today = Date::from_ymd(2025, 1, 1).unwrap();
//! let curve = DiscountCurve::flat(today, 0.03);
//!
//! let model = HullWhite::new(0.10, 0.01).unwrap();
//! let lattice = model
//!     .build_lattice(&curve, today, today.add_months(60).unwrap(), 100)
//!     .unwrap();
//!
//! // Lattice discount factors reproduce the curve by construction
//! let (df, _zero) = lattice.discount_factor(lattice.dt()).unwrap();
//! assert!(df < 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod instruments;
pub mod options;

pub use error::{BondError, BondResult};
