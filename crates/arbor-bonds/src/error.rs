//! Error types for bond and lattice operations.
//!
//! Every error is a synchronous validation failure raised before any output
//! is produced; there is no partial-failure mode. The taxonomy follows the
//! pricing pipeline: model parameters, temporal ordering, cash-flow
//! placement, and grid alignment.

use thiserror::Error;

/// A specialized Result type for bond and lattice operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond and lattice operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Invalid model parameter (negative volatility or mean reversion).
    #[error("Invalid model parameter {name}: {value}")]
    InvalidModelParameter {
        /// The parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Option expiry falls after the instrument's maturity.
    #[error("Option expiry {expiry:.6} is after bond maturity {maturity:.6}")]
    ExpiryAfterMaturity {
        /// Option expiry in years.
        expiry: f64,
        /// Bond maturity in years.
        maturity: f64,
    },

    /// Option expiry time is negative.
    #[error("Option expiry time {expiry:.6} is negative")]
    NegativeExpiry {
        /// Option expiry in years.
        expiry: f64,
    },

    /// The lattice horizon is shorter than the requested expiry.
    #[error("Lattice horizon {horizon:.6} is shorter than option expiry {expiry:.6}")]
    LatticeHorizonExceeded {
        /// Option expiry in years.
        expiry: f64,
        /// Lattice horizon in years.
        horizon: f64,
    },

    /// A coupon time falls before the valuation date.
    #[error("Coupon time {time:.6} is before the valuation date")]
    CouponBeforeValuation {
        /// The offending coupon time in years.
        time: f64,
    },

    /// A coupon time falls after the bond's maturity.
    #[error("Coupon time {time:.6} is after bond maturity {maturity:.6}")]
    CouponAfterMaturity {
        /// The offending coupon time in years.
        time: f64,
        /// Bond maturity in years.
        maturity: f64,
    },

    /// Requested time does not sit on the lattice time grid.
    #[error("Time {time:.6} is not on the lattice grid (dt = {dt:.6})")]
    TimeOffGrid {
        /// The requested time in years.
        time: f64,
        /// The lattice step size.
        dt: f64,
    },

    /// The spatial grid half-width exceeds the configured ceiling.
    #[error("Lattice half-width {jmax} exceeds the maximum {max} (mean reversion too small for this step size)")]
    GridTooWide {
        /// The computed half-width.
        jmax: usize,
        /// The configured ceiling.
        max: usize,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    CoreError(#[from] arbor_core::ArborError),

    /// Curve error.
    #[error("Curve error: {0}")]
    CurveError(#[from] arbor_curves::CurveError),
}

impl BondError {
    /// Creates an invalid specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }
}
