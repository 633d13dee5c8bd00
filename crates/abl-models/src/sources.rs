//! Volumetric source terms: Coriolis force and prescribed driving sources.

use std::f64::consts::PI;

use abl_case::{AblDef, SourceDef};
use abl_core::{Real, Vec3, ensure_finite};
use abl_fields::FieldValue;
use rayon::prelude::*;

use crate::error::{ModelError, ModelResult};

/// Coriolis acceleration `-2 Omega x U` [m/s2].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoriolisForce {
    omega: Vec3,
}

impl CoriolisForce {
    /// Planetary rotation vector at `latitude_deg` for a rotation period in
    /// seconds. The local frame has x east, y north and z up.
    pub fn new(latitude_deg: Real, rotation_period_s: Real) -> ModelResult<Self> {
        if !(rotation_period_s.is_finite() && rotation_period_s > 0.0) {
            return Err(ModelError::InvalidParameter {
                what: "planetaryRotationPeriod",
                value: rotation_period_s,
            });
        }
        let rate = 2.0 * PI / rotation_period_s;
        let phi = ensure_finite(latitude_deg, "latitude")?.to_radians();
        Ok(Self {
            omega: Vec3::new(0.0, rate * phi.cos(), rate * phi.sin()),
        })
    }

    pub fn from_def(abl: &AblDef) -> ModelResult<Self> {
        Self::new(abl.latitude, abl.rotation_period().value)
    }

    pub fn omega(&self) -> Vec3 {
        self.omega
    }

    /// Coriolis parameter `f = 2 |Omega| sin(latitude)`.
    pub fn f(&self) -> Real {
        2.0 * self.omega.z
    }

    pub fn force(&self, u: &[Vec3]) -> Vec<Vec3> {
        let two_omega = 2.0 * self.omega;
        u.par_iter().map(|u| -two_omega.cross(u)).collect()
    }
}

/// Spatially uniform source whose value follows a time table.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingForce<T> {
    name: String,
    table: Vec<(Real, T)>,
}

impl<T: FieldValue> DrivingForce<T> {
    pub fn none(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Vec::new(),
        }
    }

    pub fn given(name: impl Into<String>, table: Vec<(Real, T)>) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        !self.table.is_empty()
    }

    /// Linear interpolation in time; the end values hold outside the table.
    pub fn value_at(&self, time: Real) -> T {
        let Some(first) = self.table.first() else {
            return T::zero();
        };
        if time <= first.0 {
            return first.1;
        }
        for w in self.table.windows(2) {
            let ((t0, v0), (t1, v1)) = (w[0], w[1]);
            if time <= t1 {
                let s = (time - t0) / (t1 - t0);
                return v0 + (v1 - v0) * s;
            }
        }
        self.table.last().map_or_else(T::zero, |last| last.1)
    }

    /// Source value in every one of `n_cells` cells at `time`.
    pub fn force(&self, n_cells: usize, time: Real) -> Vec<T> {
        vec![self.value_at(time); n_cells]
    }
}

impl DrivingForce<Vec3> {
    pub fn momentum(def: &SourceDef<[Real; 3]>) -> Self {
        match def {
            SourceDef::None => Self::none("momentum"),
            SourceDef::Given { table } => Self::given(
                "momentum",
                table.iter().map(|p| (p.time, Vec3::from(p.value))).collect(),
            ),
        }
    }
}

impl DrivingForce<Real> {
    pub fn temperature(def: &SourceDef<Real>) -> Self {
        match def {
            SourceDef::None => Self::none("temperature"),
            SourceDef::Given { table } => Self::given(
                "temperature",
                table.iter().map(|p| (p.time, p.value)).collect(),
            ),
        }
    }
}
