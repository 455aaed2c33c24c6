//! Error types for the core.
//!
//! Degenerate but valid geometry (zero range, zero relative speed, CPA in
//! the past) is never an error; it is reported in the result data.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ColregsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColregsError {
    /// Negative or non-finite speed, non-finite coordinate, bad time step
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed threshold configuration
    #[error("invalid configuration `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl ColregsError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        ColregsError::InvalidInput(msg.into())
    }

    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        ColregsError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
