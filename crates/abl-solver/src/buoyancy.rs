//! Boussinesq buoyancy anchored at the pressure reference height.

use abl_core::units::Temperature;
use abl_core::{Real, Vec3};
use abl_fields::{VolField, ops};
use abl_mesh::Mesh;
use rayon::prelude::*;

use crate::comm::Communicator;
use crate::error::{SolverError, SolverResult};
use crate::reference::PressureReference;

/// Boussinesq buoyancy model.
///
/// `rhok = 1 - (T - TRef) / TRef`, `gh = g . (C - hRef)` and the force per
/// unit mass is `-gh grad(rhok)`. The force is recomputed from the current
/// temperature on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct BuoyancyModel {
    t_ref: Real,
    beta: Real,
    gravity: Vec3,
    h_ref: Vec3,
}

impl BuoyancyModel {
    /// `hRef` is the centre of the reference cell, summed over all partitions
    /// so that every partition ends up with the same value. Without a
    /// reference cell it is the origin.
    pub fn new(
        mesh: &Mesh,
        reference: &PressureReference,
        t_ref: Temperature,
        gravity: Vec3,
        comm: &dyn Communicator,
    ) -> SolverResult<Self> {
        let t_ref = t_ref.value;
        if !(t_ref.is_finite() && t_ref > 0.0) {
            return Err(SolverError::Configuration {
                what: format!("TRef must be positive, got {t_ref}"),
            });
        }
        let local = match reference.cell {
            Some(cell) => mesh.cell_centre(cell).ok_or_else(|| SolverError::Invariant {
                what: format!("reference cell {cell} is not a local cell"),
            })?,
            None => Vec3::zeros(),
        };
        let h_ref = comm.sum_vec3(local);
        tracing::debug!(rank = comm.rank(), h_ref = ?h_ref, "buoyancy reference height");
        Ok(Self {
            t_ref,
            beta: 1.0 / t_ref,
            gravity,
            h_ref,
        })
    }

    pub fn t_ref(&self) -> Real {
        self.t_ref
    }

    pub fn beta(&self) -> Real {
        self.beta
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn h_ref(&self) -> Vec3 {
        self.h_ref
    }

    pub fn rhok_value(&self, t: Real) -> Real {
        1.0 - self.beta * (t - self.t_ref)
    }

    /// Kinematic density ratio, cells and boundary faces.
    pub fn rhok(&self, t: &VolField<Real>) -> VolField<Real> {
        t.derived("rhok", |t| self.rhok_value(t))
    }

    /// `g . (x - hRef)` at one point.
    pub fn gh_at(&self, x: &Vec3) -> Real {
        self.gravity.dot(&(x - self.h_ref))
    }

    /// `gh` at every cell centre.
    pub fn gh(&self, mesh: &Mesh) -> Vec<Real> {
        mesh.cell_centres().par_iter().map(|c| self.gh_at(c)).collect()
    }

    /// `gh` at every face centre.
    pub fn ghf(&self, mesh: &Mesh) -> Vec<Real> {
        mesh.face_centres().par_iter().map(|c| self.gh_at(c)).collect()
    }

    /// Buoyancy acceleration `-gh grad(rhok)` per cell.
    pub fn force(&self, mesh: &Mesh, t: &VolField<Real>) -> Vec<Vec3> {
        let grad = ops::grad_scalar(mesh, &self.rhok(t));
        grad.par_iter()
            .zip(mesh.cell_centres().par_iter())
            .map(|(g, c)| *g * -self.gh_at(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::SerialComm;
    use abl_core::{CellId, units::k};
    use abl_fields::BoundaryCondition;
    use abl_mesh::BoxMeshBuilder;

    fn reference(cell: Option<usize>) -> PressureReference {
        PressureReference {
            needed: cell.is_some(),
            value: 0.0,
            cell: cell.map(|c| CellId::from_index(c as u32)),
        }
    }

    #[test]
    fn reference_height_is_cell_centre() {
        let mesh = BoxMeshBuilder::new([2, 2, 2], [2.0, 2.0, 2.0])
            .build()
            .unwrap();
        let g = Vec3::new(0.0, 0.0, -9.81);
        let b = BuoyancyModel::new(&mesh, &reference(Some(7)), k(300.0), g, &SerialComm).unwrap();
        assert_eq!(b.h_ref(), Vec3::new(1.5, 1.5, 1.5));
        assert_eq!(b.gh(&mesh)[7], 0.0);
    }

    #[test]
    fn no_reference_anchors_at_origin() {
        let mesh = BoxMeshBuilder::new([1, 1, 2], [1.0, 1.0, 2.0])
            .build()
            .unwrap();
        let b = BuoyancyModel::new(
            &mesh,
            &reference(None),
            k(300.0),
            Vec3::new(0.0, 0.0, -10.0),
            &SerialComm,
        )
        .unwrap();
        assert_eq!(b.h_ref(), Vec3::zeros());
        assert_eq!(b.gh(&mesh), vec![-5.0, -15.0]);
    }

    #[test]
    fn rhok_is_one_at_reference_temperature() {
        let mesh = BoxMeshBuilder::new([1, 1, 1], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let b = BuoyancyModel::new(
            &mesh,
            &reference(Some(0)),
            k(300.0),
            Vec3::new(0.0, 0.0, -9.81),
            &SerialComm,
        )
        .unwrap();
        assert_eq!(b.rhok_value(300.0), 1.0);
        assert!((b.rhok_value(303.0) - 0.99).abs() < 1e-15);
    }

    #[test]
    fn uniform_temperature_has_no_force() {
        let mesh = BoxMeshBuilder::new([2, 2, 2], [2.0, 2.0, 2.0])
            .build()
            .unwrap();
        let b = BuoyancyModel::new(
            &mesh,
            &reference(Some(0)),
            k(300.0),
            Vec3::new(0.0, 0.0, -9.81),
            &SerialComm,
        )
        .unwrap();
        let t = VolField::uniform(&mesh, "T", 305.0, |_| BoundaryCondition::ZeroGradient);
        for f in b.force(&mesh, &t) {
            assert!(f.norm() < 1e-12);
        }
    }

    #[test]
    fn rejects_non_positive_reference_temperature() {
        let mesh = BoxMeshBuilder::new([1, 1, 1], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        assert!(BuoyancyModel::new(&mesh, &reference(None), k(0.0), Vec3::zeros(), &SerialComm).is_err());
    }
}
