//! Molecular transport models.

use abl_case::TransportDef;
use abl_core::Real;
use abl_fields::FieldStore;
use abl_mesh::Mesh;

use crate::error::{ModelError, ModelResult};

/// Laminar (molecular) transport coefficients per cell.
pub trait TransportModel: Send + Sync {
    fn name(&self) -> &str;

    /// Update the coefficients from the current fields.
    fn correct(&mut self, mesh: &Mesh, fields: &FieldStore) -> ModelResult<()>;

    /// Kinematic viscosity [m2/s].
    fn nu(&self) -> &[Real];

    /// Kinematic thermal conductivity `nu / Pr` [m2/s].
    fn kappa(&self) -> &[Real];
}

pub const TRANSPORT_MODELS: [&str; 1] = ["Newtonian"];

/// Constant viscosity fluid.
#[derive(Debug, Clone)]
pub struct Newtonian {
    nu0: Real,
    pr: Real,
    nu: Vec<Real>,
    kappa: Vec<Real>,
}

impl Newtonian {
    pub fn new(nu: Real, pr: Real, n_cells: usize) -> ModelResult<Self> {
        if !(nu.is_finite() && nu > 0.0) {
            return Err(ModelError::InvalidParameter { what: "nu", value: nu });
        }
        if !(pr.is_finite() && pr > 0.0) {
            return Err(ModelError::InvalidParameter { what: "Pr", value: pr });
        }
        Ok(Self {
            nu0: nu,
            pr,
            nu: vec![nu; n_cells],
            kappa: vec![nu / pr; n_cells],
        })
    }
}

impl TransportModel for Newtonian {
    fn name(&self) -> &str {
        "Newtonian"
    }

    fn correct(&mut self, mesh: &Mesh, _fields: &FieldStore) -> ModelResult<()> {
        let n = mesh.n_cells();
        self.nu.resize(n, self.nu0);
        self.kappa.resize(n, self.nu0 / self.pr);
        Ok(())
    }

    fn nu(&self) -> &[Real] {
        &self.nu
    }

    fn kappa(&self) -> &[Real] {
        &self.kappa
    }
}

/// Build the transport model named in the case file.
pub fn new_transport(def: &TransportDef, mesh: &Mesh) -> ModelResult<Box<dyn TransportModel>> {
    match def.model.as_str() {
        "Newtonian" => {
            tracing::debug!(nu = def.nu, pr = def.pr, "Newtonian transport");
            Ok(Box::new(Newtonian::new(
                def.nu().value,
                def.pr().value,
                mesh.n_cells(),
            )?))
        }
        other => Err(ModelError::UnknownModel {
            kind: "transport",
            name: other.to_string(),
            available: TRANSPORT_MODELS.join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abl_mesh::BoxMeshBuilder;

    fn def(model: &str) -> TransportDef {
        TransportDef {
            model: model.to_string(),
            nu: 1.5e-5,
            t_ref: 300.0,
            pr: 0.75,
            prt: 0.33,
        }
    }

    #[test]
    fn newtonian_kappa_is_nu_over_pr() {
        let mesh = BoxMeshBuilder::new([2, 1, 1], [2.0, 1.0, 1.0])
            .build()
            .unwrap();
        let model = new_transport(&def("Newtonian"), &mesh).unwrap();
        assert_eq!(model.name(), "Newtonian");
        assert_eq!(model.nu(), &[1.5e-5, 1.5e-5]);
        assert!((model.kappa()[0] - 2.0e-5).abs() < 1e-18);
    }

    #[test]
    fn unknown_model_lists_alternatives() {
        let mesh = BoxMeshBuilder::new([1, 1, 1], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let err = new_transport(&def("powerLaw"), &mesh).err().unwrap();
        let msg = err.to_string();
        assert!(msg.contains("powerLaw"));
        assert!(msg.contains("Newtonian"));
    }
}
