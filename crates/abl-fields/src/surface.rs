//! Face-centred scalar fields (volumetric flux).

use abl_core::{Real, Vec3};
use abl_mesh::Mesh;
use serde::{Deserialize, Serialize};

use crate::field::VolField;
use crate::ops;

/// One scalar per mesh face, internal faces first then boundary faces.
///
/// Layout mirrors the mesh face list, so a boundary face value is looked up
/// by its absolute face index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceField {
    name: String,
    values: Vec<Real>,
}

impl SurfaceField {
    pub fn new(name: impl Into<String>, values: Vec<Real>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Volumetric flux `phi_f = U_f . S_f` from a velocity field.
    ///
    /// Internal faces use linear interpolation, boundary faces use the
    /// boundary value of `u`.
    pub fn flux(mesh: &Mesh, u: &VolField<Vec3>) -> Self {
        let areas = mesh.face_areas();
        let mut values: Vec<Real> = ops::interpolate(mesh, u)
            .iter()
            .zip(areas)
            .map(|(uf, sf)| uf.dot(sf))
            .collect();
        for (patch, pf) in mesh.patches().iter().zip(u.patches()) {
            for (face, uf) in patch.faces().zip(pf.values()) {
                values.push(uf.dot(&areas[face]));
            }
        }
        Self::new("phi", values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Real] {
        &mut self.values
    }

    /// Value at an absolute face index; 0 for faces outside the field.
    pub fn face_value(&self, face: usize) -> Real {
        self.values.get(face).copied().unwrap_or(0.0)
    }

    /// Net outflow of every cell, i.e. the discrete divergence times volume.
    pub fn net_outflow(&self, mesh: &Mesh) -> Vec<Real> {
        let mut div = vec![0.0; mesh.n_cells()];
        let owner = mesh.owner();
        let neighbour = mesh.neighbour();
        for (face, &phi) in self.values.iter().enumerate() {
            div[owner[face]] += phi;
            if face < neighbour.len() {
                div[neighbour[face]] -= phi;
            }
        }
        div
    }
}
