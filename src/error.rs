//! Error types for the Meeting Cost Engine.
//!
//! The cost model itself never fails: loosely-typed input is coerced
//! by [`crate::sanitize`] before it reaches the arithmetic.  Errors
//! exist for two situations only: a caller handing the aggregator a
//! value no well-behaved caller would produce ([`EngineError`]), and a
//! person typing a value outside the accepted range
//! ([`ValidationError`]).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid {field}: {value} (must be a finite number of minutes from 0 to 1440)")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("attendee {index} has a non-finite per-minute cost: {value}")]
    InvalidAttendeeCost { index: usize, value: f64 },

    #[error("invalid rate {field}: {value}")]
    InvalidRate { field: &'static str, value: f64 },

    #[error("conflicting rate configuration: {0}")]
    ConflictingRates(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at least {min_len} characters")]
    TooShort { field: &'static str, min_len: usize },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: f64 },

    #[error("{field} cannot exceed {max}")]
    AboveMaximum { field: &'static str, max: f64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
