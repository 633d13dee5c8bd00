#![allow(dead_code)]

use abl_case::{CaseDef, from_yaml_str};
use abl_core::{SymmTensor, Vec3};
use abl_fields::{BoundaryCondition, FieldStore, VolField, WallModel};
use abl_mesh::{Mesh, Patch};

pub fn case(extra: &str) -> CaseDef {
    from_yaml_str(&format!(
        r#"
name: test
mesh:
  cells: [6, 2, 4]
  lengths: [600.0, 200.0, 400.0]
transport:
  nu: 1.0e-5
  TRef: 300.0
  Pr: 0.7
  Prt: 0.7
{extra}
"#
    ))
    .unwrap()
}

fn zero_gradient<T>(_: &Patch) -> BoundaryCondition<T> {
    BoundaryCondition::ZeroGradient
}

/// How the `p_rgh` boundary is set up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pressure {
    /// Zero gradient everywhere.
    Floating,
    /// Fixed value on the upper boundary.
    FixedTop,
    /// Inflow/outflow on the west and east sides.
    InletOutlet,
}

/// Fields with `U = (5, 0, 0)`, a stably stratified `T` and uniform `p_rgh`.
pub fn store(mesh: &Mesh, pressure: Pressure, p0: f64) -> FieldStore {
    let p_rgh = VolField::uniform(mesh, "p_rgh", p0, |patch| match pressure {
        Pressure::FixedTop if patch.name == "upper" => BoundaryCondition::FixedValue { value: p0 },
        Pressure::InletOutlet if patch.name == "west" || patch.name == "east" => {
            BoundaryCondition::InletOutlet { inlet_value: p0 }
        }
        _ => BoundaryCondition::ZeroGradient,
    });

    let mut t = VolField::uniform(mesh, "T", 300.0, zero_gradient);
    let mut u = VolField::uniform(mesh, "U", Vec3::new(5.0, 0.0, 0.0), zero_gradient);
    for ((t, u), c) in t
        .internal_mut()
        .iter_mut()
        .zip(u.internal_mut().iter_mut())
        .zip(mesh.cell_centres())
    {
        *t = 300.0 + 0.003 * c.z;
        *u = Vec3::new(5.0 + 0.01 * c.z, 0.5, 0.0);
    }

    FieldStore::from_fields(
        mesh,
        t,
        p_rgh,
        u,
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
                BoundaryCondition::WallModel(WallModel::SurfaceTemperatureLogLaw {
                    surface_temperature: 299.0,
                    z0: 0.1,
                    kappa: 0.41,
                    prt: 0.74,
                })
            } else {
                BoundaryCondition::ZeroGradient
            }
        }),
    )
}
