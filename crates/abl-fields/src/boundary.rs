//! Boundary conditions and wall models.

use abl_core::{Real, Vec3, constants::KAPPA_VK};
use abl_mesh::{Mesh, Patch};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};
use crate::surface::SurfaceField;
use crate::value::FieldValue;

/// Boundary condition attached to one patch of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoundaryCondition<T> {
    /// Dirichlet value on every face of the patch.
    FixedValue { value: T },
    /// Face value equals the adjacent cell value.
    ZeroGradient,
    /// Derived field; the face takes the adjacent cell value.
    Calculated,
    /// Fixed value on inflow faces (negative flux), zero gradient on outflow faces.
    InletOutlet {
        #[serde(rename = "inletValue")]
        inlet_value: T,
    },
    /// Face value produced by a wall model from the near-wall cell state.
    WallModel(WallModel),
    /// Partition cut. Assigned automatically, never read from or written to file.
    #[serde(skip)]
    Processor,
}

impl<T> BoundaryCondition<T> {
    pub fn type_name(&self) -> &'static str {
        match self {
            BoundaryCondition::FixedValue { .. } => "fixedValue",
            BoundaryCondition::ZeroGradient => "zeroGradient",
            BoundaryCondition::Calculated => "calculated",
            BoundaryCondition::InletOutlet { .. } => "inletOutlet",
            BoundaryCondition::WallModel(_) => "wallModel",
            BoundaryCondition::Processor => "processor",
        }
    }

    /// Whether this condition pins the field level on `patch`.
    ///
    /// `inletOutlet` only reports a fixed level when `update_fixes_value` is
    /// set and at least one face of the patch currently carries inflow.
    pub fn fixes_value(&self, patch: &Patch, ctx: &PatchContext<'_>, update_fixes_value: bool) -> bool {
        match self {
            BoundaryCondition::FixedValue { .. } | BoundaryCondition::WallModel(_) => true,
            BoundaryCondition::InletOutlet { .. } => {
                update_fixes_value
                    && ctx
                        .flux
                        .is_some_and(|phi| patch.faces().any(|f| phi.face_value(f) < 0.0))
            }
            BoundaryCondition::ZeroGradient
            | BoundaryCondition::Calculated
            | BoundaryCondition::Processor => false,
        }
    }
}

/// Near-wall models evaluated face by face on wall patches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum WallModel {
    /// Log-law surface shear stress (Schumann 1975, Grotzbach 1987).
    SchumannGrotzbach {
        z0: Real,
        #[serde(default = "default_kappa")]
        kappa: Real,
    },
    /// Prescribed kinematic surface temperature flux [K m/s].
    SpecifiedSurfaceHeatFlux { flux: Real },
    /// Temperature flux from a surface temperature through the log law.
    SurfaceTemperatureLogLaw {
        #[serde(rename = "surfaceTemperature")]
        surface_temperature: Real,
        z0: Real,
        #[serde(default = "default_kappa")]
        kappa: Real,
        #[serde(default = "default_prt")]
        prt: Real,
    },
}

impl WallModel {
    pub fn name(&self) -> &'static str {
        match self {
            WallModel::SchumannGrotzbach { .. } => "SchumannGrotzbach",
            WallModel::SpecifiedSurfaceHeatFlux { .. } => "SpecifiedSurfaceHeatFlux",
            WallModel::SurfaceTemperatureLogLaw { .. } => "SurfaceTemperatureLogLaw",
        }
    }

    /// Check the model coefficients; the error is the reason they are rejected.
    pub fn validate(&self) -> Result<(), &'static str> {
        let positive = |v: Real| v.is_finite() && v > 0.0;
        match *self {
            WallModel::SchumannGrotzbach { z0, kappa } => {
                if !positive(z0) {
                    return Err("needs a positive roughness length z0");
                }
                if !positive(kappa) {
                    return Err("needs a positive von Karman constant");
                }
            }
            WallModel::SpecifiedSurfaceHeatFlux { flux } => {
                if !flux.is_finite() {
                    return Err("needs a finite surface flux");
                }
            }
            WallModel::SurfaceTemperatureLogLaw {
                surface_temperature,
                z0,
                kappa,
                prt,
            } => {
                if !surface_temperature.is_finite() {
                    return Err("needs a finite surface temperature");
                }
                if !positive(z0) {
                    return Err("needs a positive roughness length z0");
                }
                if !positive(kappa) {
                    return Err("needs a positive von Karman constant");
                }
                if !positive(prt) {
                    return Err("needs a positive Prandtl number");
                }
            }
        }
        Ok(())
    }
}

fn default_kappa() -> Real {
    KAPPA_VK
}

fn default_prt() -> Real {
    0.74
}

/// Read-only view of the state a boundary condition may depend on.
///
/// The field being corrected is never part of its own context, so the
/// store can hand out disjoint borrows of the other fields.
#[derive(Clone, Copy)]
pub struct PatchContext<'a> {
    pub mesh: &'a Mesh,
    pub velocity: Option<&'a [Vec3]>,
    pub temperature: Option<&'a [Real]>,
    pub flux: Option<&'a SurfaceField>,
}

impl<'a> PatchContext<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        Self {
            mesh,
            velocity: None,
            temperature: None,
            flux: None,
        }
    }

    pub fn with_velocity(mut self, u: &'a [Vec3]) -> Self {
        self.velocity = Some(u);
        self
    }

    pub fn with_temperature(mut self, t: &'a [Real]) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn with_flux(mut self, phi: &'a SurfaceField) -> Self {
        self.flux = Some(phi);
        self
    }

    pub(crate) fn require_velocity(&self, condition: &'static str) -> FieldResult<&'a [Vec3]> {
        self.velocity.ok_or(FieldError::BoundaryCondition {
            field: String::new(),
            patch: String::new(),
            condition,
            reason: "needs the velocity field",
        })
    }

    pub(crate) fn require_temperature(&self, condition: &'static str) -> FieldResult<&'a [Real]> {
        self.temperature.ok_or(FieldError::BoundaryCondition {
            field: String::new(),
            patch: String::new(),
            condition,
            reason: "needs the temperature field",
        })
    }
}

/// `ln(z / z0)` of the log law at wall distance `z`. Fails unless `0 < z0 < z`.
pub fn log_law_ratio(z: Real, z0: Real, condition: &'static str) -> FieldResult<Real> {
    let reason = if !(z0.is_finite() && z0 > 0.0) {
        "needs a positive roughness length z0"
    } else if !(z > z0) {
        "has z0 at or above the near-wall cell centre"
    } else {
        return Ok((z / z0).ln());
    };
    Err(FieldError::BoundaryCondition {
        field: String::new(),
        patch: String::new(),
        condition,
        reason,
    })
}

/// Log-law friction velocity from the horizontal velocity and `ln(z / z0)`.
pub fn friction_velocity(u: Vec3, log_ratio: Real, kappa: Real) -> Real {
    let mag = Vec3::new(u.x, u.y, 0.0).norm();
    kappa * mag / log_ratio
}

/// Evaluate one condition over a patch, writing `values`.
pub(crate) fn evaluate<T: FieldValue>(
    condition: &BoundaryCondition<T>,
    patch: &Patch,
    internal: &[T],
    ctx: &PatchContext<'_>,
    values: &mut [T],
) -> FieldResult<()> {
    let owner = ctx.mesh.owner();
    match condition {
        BoundaryCondition::FixedValue { value } => values.fill(*value),
        BoundaryCondition::ZeroGradient
        | BoundaryCondition::Calculated
        | BoundaryCondition::Processor => {
            for (v, face) in values.iter_mut().zip(patch.faces()) {
                *v = internal[owner[face]];
            }
        }
        BoundaryCondition::InletOutlet { inlet_value } => {
            let phi = ctx.flux.ok_or(FieldError::BoundaryCondition {
                field: String::new(),
                patch: String::new(),
                condition: "inletOutlet",
                reason: "needs the face flux",
            })?;
            for (v, face) in values.iter_mut().zip(patch.faces()) {
                *v = if phi.face_value(face) < 0.0 {
                    *inlet_value
                } else {
                    internal[owner[face]]
                };
            }
        }
        BoundaryCondition::WallModel(model) => {
            for (v, face) in values.iter_mut().zip(patch.faces()) {
                *v = T::wall_model(model, ctx, face)?;
            }
        }
    }
    Ok(())
}
