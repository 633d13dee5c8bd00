//! Workspace-wide error type.
//!
//! Every crate keeps its own error enum and converts into [`AblError`] at the
//! boundary, so callers that only care about the category can match here.

use thiserror::Error;

pub type AblResult<T> = Result<T, AblError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AblError {
    /// A NaN or infinity reached a quantity that must stay finite.
    #[error("{what} is not finite ({value})")]
    NonFinite { what: &'static str, value: f64 },

    /// Bad input from the case file or the caller.
    #[error("Configuration error in {what}")]
    Configuration { what: &'static str },

    #[error("{what} {index} is out of range (0..{len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Internal consistency check failed, e.g. between partitions.
    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

impl AblError {
    /// Whether the error comes from user input rather than the computation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AblError::Configuration { .. } | AblError::OutOfRange { .. })
    }
}
