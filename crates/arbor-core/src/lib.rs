//! # Arbor Core
//!
//! Core types and conventions for the Arbor fixed income lattice pricing
//! library.
//!
//! This crate provides the foundational building blocks used throughout
//! Arbor:
//!
//! - **Types**: Domain types like [`types::Date`] and [`types::Frequency`]
//! - **Day Count Conventions**: Year fraction calculations for accrual and
//!   time-to-maturity conversion
//! - **Errors**: The [`ArborError`] validation error layer
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: Newtypes prevent mixing incompatible values
//! - **Explicit Over Implicit**: Invalid inputs fail construction, they are
//!   never silently repaired
//!
//! ## Example
//!
//! ```rust
//! use arbor_core::daycounts::{Act365Fixed, DayCount};
//! use arbor_core::types::Date;
//!
//! let dc = Act365Fixed;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2026, 1, 15).unwrap();
//!
//! assert!((dc.year_fraction(start, end) - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod types;

pub use error::{ArborError, ArborResult};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::daycounts::{Act365Fixed, DayCount, DayCountConvention, Thirty360E};
    pub use crate::error::{ArborError, ArborResult};
    pub use crate::types::{Date, Frequency};
}
