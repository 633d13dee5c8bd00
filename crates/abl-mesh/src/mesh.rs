//! Core mesh data structures.

use std::ops::Range;

use abl_core::{CellId, PatchId, Real, Vec3};

use crate::error::{MeshError, MeshResult};
use crate::validate;

/// Role of a boundary patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    /// Generic open boundary (inflow, outflow, top).
    Patch,
    /// Solid wall (the ground); wall models act here.
    Wall,
    /// Cut between two partitions of a decomposed mesh.
    Processor { neighbour_rank: usize },
}

impl PatchKind {
    pub fn is_wall(&self) -> bool {
        matches!(self, PatchKind::Wall)
    }

    pub fn is_processor(&self) -> bool {
        matches!(self, PatchKind::Processor { .. })
    }
}

/// A named, contiguous run of boundary faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub id: PatchId,
    pub name: String,
    pub kind: PatchKind,
    /// Absolute index of the first face in the mesh face list.
    pub start: usize,
    pub size: usize,
}

impl Patch {
    /// Absolute face indices covered by this patch.
    pub fn faces(&self) -> Range<usize> {
        self.start..self.start + self.size
    }
}

/// Raw arrays handed to [`Mesh::from_parts`].
///
/// Face arrays list internal faces first, then boundary faces grouped by
/// patch in patch order.
#[derive(Debug, Clone, Default)]
pub struct MeshParts {
    pub cell_centres: Vec<Vec3>,
    pub cell_volumes: Vec<Real>,
    pub owner: Vec<usize>,
    pub neighbour: Vec<usize>,
    pub face_areas: Vec<Vec3>,
    pub face_centres: Vec<Vec3>,
    /// (name, kind, size) in face order.
    pub patches: Vec<(String, PatchKind, usize)>,
    /// Global cell index of each local cell.
    pub global_cells: Vec<usize>,
    pub n_global_cells: usize,
}

/// One partition of a finite-volume mesh.
///
/// A serial run is a single partition whose global and local numbering
/// coincide. Geometry is immutable once built.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) cell_centres: Vec<Vec3>,
    pub(crate) cell_volumes: Vec<Real>,
    pub(crate) owner: Vec<usize>,
    pub(crate) neighbour: Vec<usize>,
    pub(crate) face_areas: Vec<Vec3>,
    pub(crate) face_centres: Vec<Vec3>,
    pub(crate) patches: Vec<Patch>,
    pub(crate) global_cells: Vec<usize>,
    pub(crate) n_global_cells: usize,
}

impl Mesh {
    /// Assemble and validate a mesh from raw arrays.
    pub fn from_parts(parts: MeshParts) -> MeshResult<Self> {
        let n_internal = parts.neighbour.len();
        let mut start = n_internal;
        let mut patches = Vec::with_capacity(parts.patches.len());
        for (i, (name, kind, size)) in parts.patches.into_iter().enumerate() {
            let id = PatchId::try_from_usize(i).ok_or_else(|| MeshError::InvalidSpec {
                what: format!("too many patches ({i})"),
            })?;
            patches.push(Patch {
                id,
                name,
                kind,
                start,
                size,
            });
            start += size;
        }

        let mesh = Self {
            cell_centres: parts.cell_centres,
            cell_volumes: parts.cell_volumes,
            owner: parts.owner,
            neighbour: parts.neighbour,
            face_areas: parts.face_areas,
            face_centres: parts.face_centres,
            patches,
            global_cells: parts.global_cells,
            n_global_cells: parts.n_global_cells,
        };
        validate::validate_structure(&mesh)?;
        validate::validate_geometry(&mesh)?;
        Ok(mesh)
    }

    pub fn n_cells(&self) -> usize {
        self.cell_centres.len()
    }

    /// Cells across all partitions of the decomposed domain.
    pub fn n_global_cells(&self) -> usize {
        self.n_global_cells
    }

    pub fn n_internal_faces(&self) -> usize {
        self.neighbour.len()
    }

    pub fn n_faces(&self) -> usize {
        self.owner.len()
    }

    pub fn n_boundary_faces(&self) -> usize {
        self.n_faces() - self.n_internal_faces()
    }

    pub fn cell_centres(&self) -> &[Vec3] {
        &self.cell_centres
    }

    pub fn cell_centre(&self, cell: CellId) -> Option<Vec3> {
        self.cell_centres.get(cell.as_usize()).copied()
    }

    pub fn cell_volumes(&self) -> &[Real] {
        &self.cell_volumes
    }

    /// Owner cell of every face (internal and boundary).
    pub fn owner(&self) -> &[usize] {
        &self.owner
    }

    /// Neighbour cell of every internal face.
    pub fn neighbour(&self) -> &[usize] {
        &self.neighbour
    }

    /// Area-weighted face normals, pointing out of the owner cell.
    pub fn face_areas(&self) -> &[Vec3] {
        &self.face_areas
    }

    pub fn face_centres(&self) -> &[Vec3] {
        &self.face_centres
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patch(&self, id: PatchId) -> Option<&Patch> {
        self.patches.get(id.as_usize())
    }

    pub fn patch_by_name(&self, name: &str) -> Option<&Patch> {
        self.patches.iter().find(|p| p.name == name)
    }

    /// Global index of a local cell.
    pub fn global_cell(&self, cell: CellId) -> Option<usize> {
        self.global_cells.get(cell.as_usize()).copied()
    }

    /// Global index of every local cell, in local order.
    pub fn global_cells(&self) -> &[usize] {
        &self.global_cells
    }

    /// Local id of a global cell index, if this partition owns it.
    pub fn local_cell(&self, global: usize) -> Option<CellId> {
        self.global_cells
            .iter()
            .position(|&g| g == global)
            .and_then(CellId::try_from_usize)
    }

    /// Linear interpolation weight of the owner value on each internal face.
    ///
    /// `phi_f = w * phi_owner + (1 - w) * phi_neighbour`
    pub fn interpolation_weights(&self) -> Vec<Real> {
        (0..self.n_internal_faces())
            .map(|f| {
                let sf = self.face_areas[f];
                let co = self.cell_centres[self.owner[f]];
                let cn = self.cell_centres[self.neighbour[f]];
                let cf = self.face_centres[f];
                let d_fn = sf.dot(&(cn - cf));
                let d_on = sf.dot(&(cn - co));
                if d_on.abs() > Real::EPSILON {
                    d_fn / d_on
                } else {
                    0.5
                }
            })
            .collect()
    }

    /// Normal distance from the owner cell centre to a boundary face.
    pub fn wall_distance(&self, face: usize) -> Real {
        let sf = self.face_areas[face];
        let mag = sf.norm();
        if mag <= Real::EPSILON {
            return 0.0;
        }
        let d = self.face_centres[face] - self.cell_centres[self.owner[face]];
        (sf / mag).dot(&d).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cell_parts() -> MeshParts {
        // Two unit cubes side by side along x, with one boundary patch per side.
        MeshParts {
            cell_centres: vec![Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 0.5, 0.5)],
            cell_volumes: vec![1.0, 1.0],
            owner: vec![0, 0, 1],
            neighbour: vec![1],
            face_areas: vec![
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            face_centres: vec![
                Vec3::new(1.0, 0.5, 0.5),
                Vec3::new(0.0, 0.5, 0.5),
                Vec3::new(2.0, 0.5, 0.5),
            ],
            patches: vec![
                ("west".into(), PatchKind::Patch, 1),
                ("east".into(), PatchKind::Wall, 1),
            ],
            global_cells: vec![0, 1],
            n_global_cells: 2,
        }
    }

    #[test]
    fn patch_faces_follow_internal_faces() {
        let mesh = Mesh::from_parts(two_cell_parts()).unwrap();
        assert_eq!(mesh.n_internal_faces(), 1);
        assert_eq!(mesh.n_boundary_faces(), 2);
        assert_eq!(mesh.patch_by_name("west").unwrap().faces(), 1..2);
        assert_eq!(mesh.patch_by_name("east").unwrap().faces(), 2..3);
        assert!(mesh.patch_by_name("east").unwrap().kind.is_wall());
    }

    #[test]
    fn weights_are_half_on_uniform_spacing() {
        let mesh = Mesh::from_parts(two_cell_parts()).unwrap();
        assert_eq!(mesh.interpolation_weights(), vec![0.5]);
    }

    #[test]
    fn wall_distance_is_half_cell() {
        let mesh = Mesh::from_parts(two_cell_parts()).unwrap();
        assert!((mesh.wall_distance(2) - 0.5).abs() < 1e-14);
    }

    #[test]
    fn local_and_global_cells() {
        let mesh = Mesh::from_parts(two_cell_parts()).unwrap();
        assert_eq!(mesh.local_cell(1), Some(CellId::from_index(1)));
        assert_eq!(mesh.local_cell(5), None);
        assert_eq!(mesh.global_cell(CellId::from_index(0)), Some(0));
    }

    #[test]
    fn rejects_bad_owner() {
        let mut parts = two_cell_parts();
        parts.owner[2] = 9;
        assert!(matches!(
            Mesh::from_parts(parts),
            Err(MeshError::InvalidCellRef { face: 2, cell: 9 })
        ));
    }
}
