//! Mesh-specific error types.

use abl_core::AblError;
use thiserror::Error;

/// Mesh construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A per-cell or per-face array does not match the expected length.
    #[error("{what} has {actual} entries (expected {expected})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A face references a cell that doesn't exist.
    #[error("Face {face} references non-existent cell {cell}")]
    InvalidCellRef { face: usize, cell: usize },

    /// Internal face whose owner is not lower-numbered than its neighbour.
    #[error("Face {face} has owner {owner} >= neighbour {neighbour}")]
    FaceOrdering {
        face: usize,
        owner: usize,
        neighbour: usize,
    },

    /// Patch face ranges overlap, leave gaps, or run past the face list.
    #[error("Patch '{patch}' covers faces {start}..{end}, inconsistent with the face list")]
    PatchRange {
        patch: String,
        start: usize,
        end: usize,
    },

    /// Two patches share a name.
    #[error("Duplicate patch name '{name}'")]
    DuplicatePatch { name: String },

    /// Non-positive cell volume or non-finite geometry.
    #[error("Degenerate geometry: {what}")]
    Degenerate { what: String },

    /// Builder parameters cannot produce a mesh.
    #[error("Invalid mesh specification: {what}")]
    InvalidSpec { what: String },
}

pub type MeshResult<T> = Result<T, MeshError>;

impl From<MeshError> for AblError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::InvalidSpec { .. } => AblError::Configuration {
                what: "mesh specification",
            },
            _ => AblError::Invariant {
                what: "mesh structure",
            },
        }
    }
}
