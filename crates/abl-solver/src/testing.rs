//! Field stores shared by the unit tests.

use abl_core::{SymmTensor, Vec3};
use abl_fields::{BoundaryCondition, FieldStore, VolField, WallModel};
use abl_mesh::{Mesh, Patch};

fn zero_gradient<T>(_: &Patch) -> BoundaryCondition<T> {
    BoundaryCondition::ZeroGradient
}

fn store_with(mesh: &Mesh, p_rgh: VolField<f64>) -> FieldStore {
    FieldStore::from_fields(
        mesh,
        VolField::uniform(mesh, "T", 300.0, zero_gradient),
        p_rgh,
        VolField::uniform(mesh, "U", Vec3::new(5.0, 0.0, 0.0), zero_gradient),
        VolField::uniform(mesh, "kappat", 0.0, |_| BoundaryCondition::Calculated),
        VolField::uniform(mesh, "Rwall", SymmTensor::ZERO, |p| {
            if p.kind.is_wall() {
                BoundaryCondition::WallModel(WallModel::SchumannGrotzbach { z0: 0.1, kappa: 0.41 })
            } else {
                BoundaryCondition::ZeroGradient
            }
        }),
        VolField::uniform(mesh, "qwall", Vec3::zeros(), |p| {
            if p.kind.is_wall() {
                BoundaryCondition::WallModel(WallModel::SpecifiedSurfaceHeatFlux { flux: 0.0 })
            } else {
                BoundaryCondition::ZeroGradient
            }
        }),
    )
}

/// `p_rgh` with zero-gradient conditions everywhere.
pub(crate) fn floating_store(mesh: &Mesh, p: f64) -> FieldStore {
    store_with(mesh, VolField::uniform(mesh, "p_rgh", p, zero_gradient))
}

/// `p_rgh` fixed on the upper boundary.
pub(crate) fn fixed_top_store(mesh: &Mesh, p: f64) -> FieldStore {
    store_with(
        mesh,
        VolField::uniform(mesh, "p_rgh", p, |patch| {
            if patch.name == "upper" {
                BoundaryCondition::FixedValue { value: p }
            } else {
                BoundaryCondition::ZeroGradient
            }
        }),
    )
}
