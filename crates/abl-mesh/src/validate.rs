//! Mesh validation logic.

use std::collections::HashSet;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// Validate addressing: array lengths, cell references, face ordering and patch ranges.
pub(crate) fn validate_structure(mesh: &Mesh) -> MeshResult<()> {
    let n_cells = mesh.cell_centres.len();
    let n_faces = mesh.owner.len();

    check_len("cell_volumes", n_cells, mesh.cell_volumes.len())?;
    check_len("global_cells", n_cells, mesh.global_cells.len())?;
    check_len("face_areas", n_faces, mesh.face_areas.len())?;
    check_len("face_centres", n_faces, mesh.face_centres.len())?;

    if mesh.neighbour.len() > n_faces {
        return Err(MeshError::LengthMismatch {
            what: "neighbour",
            expected: n_faces,
            actual: mesh.neighbour.len(),
        });
    }

    for (face, &cell) in mesh.owner.iter().enumerate() {
        if cell >= n_cells {
            return Err(MeshError::InvalidCellRef { face, cell });
        }
    }

    for (face, &neighbour) in mesh.neighbour.iter().enumerate() {
        if neighbour >= n_cells {
            return Err(MeshError::InvalidCellRef {
                face,
                cell: neighbour,
            });
        }
        let owner = mesh.owner[face];
        if owner >= neighbour {
            return Err(MeshError::FaceOrdering {
                face,
                owner,
                neighbour,
            });
        }
    }

    // Patches must tile the boundary faces exactly, in order
    let mut expected_start = mesh.neighbour.len();
    let mut names = HashSet::new();
    for patch in &mesh.patches {
        if !names.insert(patch.name.as_str()) {
            return Err(MeshError::DuplicatePatch {
                name: patch.name.clone(),
            });
        }
        let end = patch.start + patch.size;
        if patch.start != expected_start || end > n_faces {
            return Err(MeshError::PatchRange {
                patch: patch.name.clone(),
                start: patch.start,
                end,
            });
        }
        expected_start = end;
    }
    if expected_start != n_faces {
        return Err(MeshError::LengthMismatch {
            what: "boundary faces covered by patches",
            expected: n_faces - mesh.neighbour.len(),
            actual: expected_start - mesh.neighbour.len(),
        });
    }

    if mesh.global_cells.iter().any(|&g| g >= mesh.n_global_cells) {
        return Err(MeshError::InvalidSpec {
            what: format!(
                "global cell index exceeds global cell count {}",
                mesh.n_global_cells
            ),
        });
    }

    Ok(())
}

/// Validate geometry: positive volumes and finite coordinates.
pub(crate) fn validate_geometry(mesh: &Mesh) -> MeshResult<()> {
    for (cell, &v) in mesh.cell_volumes.iter().enumerate() {
        if !(v.is_finite() && v > 0.0) {
            return Err(MeshError::Degenerate {
                what: format!("cell {cell} has volume {v}"),
            });
        }
    }

    let finite = |v: &abl_core::Vec3| v.iter().all(|c| c.is_finite());
    if let Some(cell) = mesh.cell_centres.iter().position(|c| !finite(c)) {
        return Err(MeshError::Degenerate {
            what: format!("cell {cell} has a non-finite centre"),
        });
    }
    if let Some(face) = mesh
        .face_areas
        .iter()
        .zip(&mesh.face_centres)
        .position(|(a, c)| !finite(a) || !finite(c))
    {
        return Err(MeshError::Degenerate {
            what: format!("face {face} has non-finite geometry"),
        });
    }

    Ok(())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> MeshResult<()> {
    if expected != actual {
        return Err(MeshError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
