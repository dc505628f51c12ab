//! Error types for the Arbor core library.
//!
//! All errors are synchronous validation failures surfaced to the caller
//! with a descriptive reason; none are recovered internally.

use thiserror::Error;

/// A specialized Result type for Arbor core operations.
pub type ArborResult<T> = Result<T, ArborError>;

/// The main error type for Arbor core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArborError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Invalid model or instrument parameter.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Reason for invalidity.
        reason: String,
    },
}

impl ArborError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
