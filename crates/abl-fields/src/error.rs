//! Error types for field construction, boundary evaluation and I/O.

use abl_core::AblError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Required field '{name}' not found at {path}")]
    MissingField { name: String, path: String },

    #[error("Field '{field}' has no boundary condition for patch '{patch}'")]
    MissingPatch { field: String, patch: String },

    #[error("Field '{field}': {what} has {actual} values (expected {expected})")]
    SizeMismatch {
        field: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Field '{field}': boundary condition '{condition}' on patch '{patch}' {reason}")]
    BoundaryCondition {
        field: String,
        patch: String,
        condition: &'static str,
        reason: &'static str,
    },

    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    #[error("Numeric error: {0}")]
    Numeric(#[from] AblError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FieldResult<T> = Result<T, FieldError>;

impl From<FieldError> for AblError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Numeric(inner) => inner,
            FieldError::SizeMismatch { .. } => AblError::Invariant {
                what: "field size",
            },
            _ => AblError::Configuration { what: "field" },
        }
    }
}
