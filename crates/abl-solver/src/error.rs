//! Error types for setup and the closure refresh.

use abl_case::CaseError;
use abl_core::AblError;
use abl_fields::{FieldError, NonFiniteAt};
use abl_mesh::MeshError;
use abl_models::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Reference cell {cell} is out of range (mesh has {n_cells} cells)")]
    ReferenceCellOutOfRange { cell: usize, n_cells: usize },

    /// A closure produced a non-finite value.
    #[error("Divergence: {what} = {value} in cell {cell}")]
    Divergence {
        what: &'static str,
        cell: usize,
        value: f64,
    },

    /// A corrected closure field holds a non-finite cell or face value.
    #[error("Divergence: {field} is non-finite at {at}")]
    NonFiniteField { field: &'static str, at: NonFiniteAt },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Case error: {0}")]
    Case(#[from] CaseError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Configuration errors are fatal at setup; divergence is fatal at run time.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SolverError::Configuration { .. }
                | SolverError::ReferenceCellOutOfRange { .. }
                | SolverError::Case(_)
                | SolverError::Field(_)
                | SolverError::Model(ModelError::UnknownModel { .. })
                | SolverError::Model(ModelError::InvalidParameter { .. })
        )
    }
}

impl From<SolverError> for AblError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Configuration { .. } => AblError::Configuration {
                what: "configuration",
            },
            SolverError::ReferenceCellOutOfRange { cell, n_cells } => AblError::OutOfRange {
                what: "pRefCell",
                index: cell,
                len: n_cells,
            },
            SolverError::Divergence { what, value, .. } => AblError::NonFinite { what, value },
            SolverError::NonFiniteField { field, .. } => AblError::NonFinite {
                what: field,
                value: f64::NAN,
            },
            SolverError::Invariant { .. } => AblError::Invariant {
                what: "decomposition",
            },
            SolverError::Case(_) => AblError::Configuration { what: "case" },
            SolverError::Mesh(inner) => inner.into(),
            SolverError::Field(inner) => inner.into(),
            SolverError::Model(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_maps_to_non_finite() {
        let err: AblError = SolverError::Divergence {
            what: "nut",
            cell: 3,
            value: f64::INFINITY,
        }
        .into();
        assert!(matches!(err, AblError::NonFinite { what: "nut", .. }));
    }

    #[test]
    fn non_finite_field_names_the_location() {
        let err = SolverError::NonFiniteField {
            field: "Rwall",
            at: NonFiniteAt::Cell(4),
        };
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("Rwall"));
        assert!(err.to_string().contains("cell 4"));
        let err: AblError = err.into();
        assert!(matches!(err, AblError::NonFinite { what: "Rwall", .. }));
    }

    #[test]
    fn out_of_range_reference_is_configuration() {
        let err = SolverError::ReferenceCellOutOfRange {
            cell: 10,
            n_cells: 8,
        };
        assert!(err.is_configuration());
        assert!(err.to_string().contains("10"));
    }
}
