//! Value types a field can hold.

use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

use abl_core::{Real, SymmTensor, Vec3};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::boundary::{PatchContext, WallModel, friction_velocity, log_law_ratio};
use crate::error::{FieldError, FieldResult};

/// Per-cell value type of a [`VolField`](crate::VolField).
///
/// Implemented for scalars, vectors and symmetric tensors. Wall models are
/// dispatched through [`FieldValue::wall_model`], so each value type only
/// accepts the models that produce its kind of quantity.
pub trait FieldValue:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Real, Output = Self>
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Human-readable kind used in logs and errors.
    const KIND: &'static str;

    fn zero() -> Self;

    fn is_finite(&self) -> bool;

    /// Evaluate a wall model at one boundary face.
    fn wall_model(_model: &WallModel, _ctx: &PatchContext<'_>, _face: usize) -> FieldResult<Self> {
        Err(FieldError::BoundaryCondition {
            field: String::new(),
            patch: String::new(),
            condition: "wallModel",
            reason: "is not defined for this field type",
        })
    }
}

impl FieldValue for Real {
    const KIND: &'static str = "scalar";

    fn zero() -> Self {
        0.0
    }

    fn is_finite(&self) -> bool {
        Real::is_finite(*self)
    }
}

impl FieldValue for Vec3 {
    const KIND: &'static str = "vector";

    fn zero() -> Self {
        Vec3::zeros()
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }

    /// Surface heat flux models; the flux is carried in the z component.
    fn wall_model(model: &WallModel, ctx: &PatchContext<'_>, face: usize) -> FieldResult<Self> {
        match *model {
            WallModel::SpecifiedSurfaceHeatFlux { flux } => Ok(Vec3::new(0.0, 0.0, flux)),
            WallModel::SurfaceTemperatureLogLaw {
                surface_temperature,
                z0,
                kappa,
                prt,
            } => {
                let cell = ctx.mesh.owner()[face];
                let u = ctx.require_velocity("SurfaceTemperatureLogLaw")?[cell];
                let t = ctx.require_temperature("SurfaceTemperatureLogLaw")?[cell];
                let z = ctx.mesh.wall_distance(face);
                let log_ratio = log_law_ratio(z, z0, "SurfaceTemperatureLogLaw")?;
                let u_star = friction_velocity(u, log_ratio, kappa);
                let theta_star = kappa * (t - surface_temperature) / (prt * log_ratio);
                Ok(Vec3::new(0.0, 0.0, -u_star * theta_star))
            }
            WallModel::SchumannGrotzbach { .. } => Err(FieldError::BoundaryCondition {
                field: String::new(),
                patch: String::new(),
                condition: "SchumannGrotzbach",
                reason: "produces a stress tensor, not a vector",
            }),
        }
    }
}

impl FieldValue for SymmTensor {
    const KIND: &'static str = "symmTensor";

    fn zero() -> Self {
        SymmTensor::ZERO
    }

    fn is_finite(&self) -> bool {
        SymmTensor::is_finite(self)
    }

    /// Log-law shear stress on a ground wall whose normal is along z.
    fn wall_model(model: &WallModel, ctx: &PatchContext<'_>, face: usize) -> FieldResult<Self> {
        match *model {
            WallModel::SchumannGrotzbach { z0, kappa } => {
                let cell = ctx.mesh.owner()[face];
                let u = ctx.require_velocity("SchumannGrotzbach")?[cell];
                let z = ctx.mesh.wall_distance(face);
                let log_ratio = log_law_ratio(z, z0, "SchumannGrotzbach")?;
                let u_h = Vec3::new(u.x, u.y, 0.0);
                let mag = u_h.norm();
                if mag <= Real::EPSILON {
                    return Ok(SymmTensor::ZERO);
                }
                let u_star = friction_velocity(u, log_ratio, kappa);
                let tau = -u_star * u_star / mag;
                Ok(SymmTensor {
                    xz: tau * u_h.x,
                    yz: tau * u_h.y,
                    ..SymmTensor::ZERO
                })
            }
            _ => Err(FieldError::BoundaryCondition {
                field: String::new(),
                patch: String::new(),
                condition: "wallModel",
                reason: "produces a heat flux vector, not a stress tensor",
            }),
        }
    }
}
