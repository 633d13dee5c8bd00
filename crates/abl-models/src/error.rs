//! Model construction and evaluation errors.

use abl_core::AblError;
use abl_fields::FieldError;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    /// No model registered under the configured name.
    #[error("Unknown {kind} model '{name}' (available: {available})")]
    UnknownModel {
        kind: &'static str,
        name: String,
        available: String,
    },

    #[error("Invalid model parameter {what} = {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] AblError),
}

impl From<ModelError> for AblError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Numeric(inner) => inner,
            ModelError::Field(inner) => inner.into(),
            ModelError::UnknownModel { .. } => AblError::Configuration {
                what: "unknown model",
            },
            ModelError::InvalidParameter { what, .. } => AblError::Configuration { what },
        }
    }
}
