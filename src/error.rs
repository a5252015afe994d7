//! Error type shared by every fallible operation in the crate.
//!
//! Configuration problems (bad distribution parameters, missing keys, a
//! non-positive budget) are reported when a thing is constructed. Invalid arm
//! indices during a run are programmer errors and are surfaced immediately.
//! Numeric edge cases inside the index math never produce an `Error`; they
//! are clamped locally.

use thiserror::Error;

/// Errors produced by `cbandits`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An arm index outside `0..num_arms`.
    #[error("invalid arm index {arm} (num_arms = {num_arms})")]
    InvalidArm { arm: usize, num_arms: usize },

    /// Moments or ranges that no joint (cost, reward) distribution can have.
    #[error("invalid distribution parameters: {0}")]
    InvalidDistributionParams(String),

    /// A required configuration key was absent.
    #[error("missing parameter `{0}`")]
    MissingParameter(String),

    /// A configuration value was present but out of its domain.
    #[error("invalid parameter `{name}` = {value}")]
    InvalidParameter { name: String, value: String },

    /// Budget must be finite and strictly positive.
    #[error("degenerate budget {0}: must be finite and > 0")]
    DegenerateBudget(f64),

    /// At least one arm is required.
    #[error("arm set is empty")]
    NoArms,

    /// `num_arms` disagrees with the number of arm configurations.
    #[error("expected {expected} arm configs, got {got}")]
    ArmCountMismatch { expected: usize, got: usize },
}

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_param(name: &str, value: impl std::fmt::Display) -> Self {
        Error::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn dist(reason: impl Into<String>) -> Self {
        Error::InvalidDistributionParams(reason.into())
    }
}
