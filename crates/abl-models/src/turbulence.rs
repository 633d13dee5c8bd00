//! Turbulence closures producing an eddy viscosity per cell.
//!
//! Models are chosen at runtime by name through [`new_turbulence`] and held
//! as `Box<dyn TurbulenceModel>` for the life of the solver.

use abl_case::CaseDef;
use abl_core::{Real, SymmTensor, Vec3};
use abl_fields::{FieldStore, ops};
use abl_mesh::Mesh;
use rayon::prelude::*;

use crate::error::{ModelError, ModelResult};
use crate::transport::TransportModel;

pub trait TurbulenceModel: Send + Sync {
    fn name(&self) -> &str;

    /// Recompute the eddy viscosity from the current velocity and temperature.
    fn correct(
        &mut self,
        mesh: &Mesh,
        fields: &FieldStore,
        transport: &dyn TransportModel,
    ) -> ModelResult<()>;

    /// Turbulent kinematic viscosity [m2/s].
    fn nut(&self) -> &[Real];

    /// Turbulent thermal conductivity, for models that maintain their own.
    fn kappat(&self) -> Option<&[Real]> {
        None
    }
}

pub const TURBULENCE_MODELS: [&str; 4] = [
    "laminar",
    "constantEddyViscosity",
    "Smagorinsky",
    "stabilitySmagorinsky",
];

/// No turbulence: `nut = 0`.
#[derive(Debug, Clone, Default)]
pub struct Laminar {
    nut: Vec<Real>,
}

impl TurbulenceModel for Laminar {
    fn name(&self) -> &str {
        "laminar"
    }

    fn correct(&mut self, mesh: &Mesh, _: &FieldStore, _: &dyn TransportModel) -> ModelResult<()> {
        self.nut.clear();
        self.nut.resize(mesh.n_cells(), 0.0);
        Ok(())
    }

    fn nut(&self) -> &[Real] {
        &self.nut
    }
}

#[derive(Debug, Clone)]
pub struct ConstantEddyViscosity {
    value: Real,
    nut: Vec<Real>,
}

impl ConstantEddyViscosity {
    pub fn new(value: Real) -> ModelResult<Self> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ModelError::InvalidParameter { what: "nut", value });
        }
        Ok(Self {
            value,
            nut: Vec::new(),
        })
    }
}

impl TurbulenceModel for ConstantEddyViscosity {
    fn name(&self) -> &str {
        "constantEddyViscosity"
    }

    fn correct(&mut self, mesh: &Mesh, _: &FieldStore, _: &dyn TransportModel) -> ModelResult<()> {
        self.nut.clear();
        self.nut.resize(mesh.n_cells(), self.value);
        Ok(())
    }

    fn nut(&self) -> &[Real] {
        &self.nut
    }
}

/// Filter width `cbrt(V)` of every cell.
fn cube_root_delta(mesh: &Mesh) -> Vec<Real> {
    mesh.cell_volumes().iter().map(|v| v.cbrt()).collect()
}

/// Subgrid kinetic energy from the local equilibrium balance
/// `a k + b sqrt(k) - c = 0` with `a = Ce/delta`, `b = 2/3 tr(D)`,
/// `c = 2 Ck delta (dev(D):D)`.
pub fn equilibrium_k(d: &SymmTensor, delta: Real, ck: Real, ce: Real) -> Real {
    let a = ce / delta;
    let b = (2.0 / 3.0) * d.trace();
    let c = 2.0 * ck * delta * d.dev().double_dot(d);
    let root = (-b + (b * b + 4.0 * a * c).max(0.0).sqrt()) / (2.0 * a);
    root * root
}

/// Algebraic one-equation Smagorinsky closure, `nut = Ck delta sqrt(k)`.
#[derive(Debug, Clone)]
pub struct Smagorinsky {
    ck: Real,
    ce: Real,
    delta: Vec<Real>,
    k: Vec<Real>,
    nut: Vec<Real>,
}

impl Smagorinsky {
    pub fn new(mesh: &Mesh, ck: Real, ce: Real) -> ModelResult<Self> {
        for (what, value) in [("Ck", ck), ("Ce", ce)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidParameter { what, value });
            }
        }
        Ok(Self {
            ck,
            ce,
            delta: cube_root_delta(mesh),
            k: vec![0.0; mesh.n_cells()],
            nut: vec![0.0; mesh.n_cells()],
        })
    }

    pub fn k(&self) -> &[Real] {
        &self.k
    }

    pub fn delta(&self) -> &[Real] {
        &self.delta
    }

    fn update_k(&mut self, mesh: &Mesh, fields: &FieldStore) {
        let grad_u = ops::grad_vector(mesh, &fields.u);
        let (ck, ce) = (self.ck, self.ce);
        self.k = grad_u
            .par_iter()
            .zip(self.delta.par_iter())
            .map(|(g, &delta)| equilibrium_k(&SymmTensor::symm(g), delta, ck, ce))
            .collect();
    }
}

impl TurbulenceModel for Smagorinsky {
    fn name(&self) -> &str {
        "Smagorinsky"
    }

    fn correct(&mut self, mesh: &Mesh, fields: &FieldStore, _: &dyn TransportModel) -> ModelResult<()> {
        self.update_k(mesh, fields);
        let ck = self.ck;
        self.nut = self
            .k
            .par_iter()
            .zip(self.delta.par_iter())
            .map(|(&k, &delta)| ck * delta * k.sqrt())
            .collect();
        Ok(())
    }

    fn nut(&self) -> &[Real] {
        &self.nut
    }
}

/// Smagorinsky closure with a stratification-limited length scale
/// (Deardorff 1980).
///
/// Under stable stratification the mixing length is
/// `l = min(0.76 sqrt(k) / N, delta)`, otherwise `l = delta`. The model
/// keeps its own conductivity `kappat = (1 + 2 l / delta) nut`.
#[derive(Debug, Clone)]
pub struct StabilitySmagorinsky {
    base: Smagorinsky,
    gravity: Vec3,
    t_ref: Real,
    kappat: Vec<Real>,
}

impl StabilitySmagorinsky {
    pub fn new(mesh: &Mesh, ck: Real, ce: Real, gravity: Vec3, t_ref: Real) -> ModelResult<Self> {
        if !(t_ref.is_finite() && t_ref > 0.0) {
            return Err(ModelError::InvalidParameter {
                what: "TRef",
                value: t_ref,
            });
        }
        Ok(Self {
            base: Smagorinsky::new(mesh, ck, ce)?,
            gravity,
            t_ref,
            kappat: vec![0.0; mesh.n_cells()],
        })
    }
}

impl TurbulenceModel for StabilitySmagorinsky {
    fn name(&self) -> &str {
        "stabilitySmagorinsky"
    }

    fn correct(&mut self, mesh: &Mesh, fields: &FieldStore, _: &dyn TransportModel) -> ModelResult<()> {
        self.base.update_k(mesh, fields);
        let grad_t = ops::grad_scalar(mesh, &fields.t);
        let (g, t_ref, ck) = (self.gravity, self.t_ref, self.base.ck);

        let (nut, kappat): (Vec<Real>, Vec<Real>) = self
            .base
            .k
            .par_iter()
            .zip(self.base.delta.par_iter())
            .zip(grad_t.par_iter())
            .map(|((&k, &delta), gt)| {
                let n2 = -g.dot(gt) / t_ref;
                let l = if n2 > 0.0 {
                    (0.76 * k.sqrt() / n2.sqrt()).min(delta)
                } else {
                    delta
                };
                let nut = ck * l * k.sqrt();
                (nut, (1.0 + 2.0 * l / delta) * nut)
            })
            .unzip();
        self.base.nut = nut;
        self.kappat = kappat;
        Ok(())
    }

    fn nut(&self) -> &[Real] {
        &self.base.nut
    }

    fn kappat(&self) -> Option<&[Real]> {
        Some(&self.kappat)
    }
}

/// Build the turbulence model named in the case file.
pub fn new_turbulence(case: &CaseDef, mesh: &Mesh) -> ModelResult<Box<dyn TurbulenceModel>> {
    let def = &case.turbulence;
    let model: Box<dyn TurbulenceModel> = match def.model.as_str() {
        "laminar" => Box::new(Laminar::default()),
        "constantEddyViscosity" => Box::new(ConstantEddyViscosity::new(def.nut)?),
        "Smagorinsky" => Box::new(Smagorinsky::new(mesh, def.ck, def.ce)?),
        "stabilitySmagorinsky" => Box::new(StabilitySmagorinsky::new(
            mesh,
            def.ck,
            def.ce,
            Vec3::from(case.abl.gravity),
            case.transport.t_ref().value,
        )?),
        other => {
            return Err(ModelError::UnknownModel {
                kind: "turbulence",
                name: other.to_string(),
                available: TURBULENCE_MODELS.join(", "),
            });
        }
    };
    tracing::debug!(model = model.name(), "turbulence model selected");
    Ok(model)
}
