//! Turbulence closure refresh, run once per outer iteration.

use abl_core::Real;
use abl_core::timing::{Timer, TimingStats};
use abl_core::units::Ratio;
use abl_fields::{FieldStore, store};
use abl_mesh::Mesh;
use abl_models::{TransportModel, TurbulenceModel};
use rayon::prelude::*;

use crate::error::{SolverError, SolverResult};

/// Wall time of every refresh in this process, all partitions together.
pub static REFRESH_TIMING: TimingStats = TimingStats::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureState {
    /// The flow changed since the last refresh.
    Stale,
    Fresh,
}

/// Owns the transport and turbulence models and re-derives the closure
/// fields (`kappat`, `Rwall`, `qwall`) from them.
pub struct ClosureRefresh {
    transport: Box<dyn TransportModel>,
    turbulence: Box<dyn TurbulenceModel>,
    prt: Real,
    state: ClosureState,
}

impl ClosureRefresh {
    pub fn new(
        transport: Box<dyn TransportModel>,
        turbulence: Box<dyn TurbulenceModel>,
        prt: Ratio,
    ) -> SolverResult<Self> {
        let prt = prt.value;
        if !(prt.is_finite() && prt > 0.0) {
            return Err(SolverError::Configuration {
                what: format!("Prt must be positive, got {prt}"),
            });
        }
        Ok(Self {
            transport,
            turbulence,
            prt,
            state: ClosureState::Stale,
        })
    }

    pub fn state(&self) -> ClosureState {
        self.state
    }

    /// Call after the flow solve has advanced the fields.
    pub fn mark_stale(&mut self) {
        self.state = ClosureState::Stale;
    }

    pub fn prt(&self) -> Real {
        self.prt
    }

    pub fn transport(&self) -> &dyn TransportModel {
        self.transport.as_ref()
    }

    pub fn turbulence(&self) -> &dyn TurbulenceModel {
        self.turbulence.as_ref()
    }

    /// Correct the models, set `kappat = nut / Prt` and re-evaluate the
    /// boundary conditions of `kappat`, `Rwall` and `qwall`, in that order.
    ///
    /// `kappat` is overwritten even when the turbulence model keeps its own
    /// conductivity. A non-finite `nut` or corrected field is fatal and
    /// leaves the closure stale.
    pub fn refresh(&mut self, mesh: &Mesh, fields: &mut FieldStore) -> SolverResult<()> {
        let timer = Timer::start("closure refresh");

        self.transport.correct(mesh, fields)?;
        self.turbulence
            .correct(mesh, fields, self.transport.as_ref())?;

        let nut = self.turbulence.nut();
        if nut.len() != mesh.n_cells() {
            return Err(SolverError::Invariant {
                what: format!(
                    "{} returned {} nut values for {} cells",
                    self.turbulence.name(),
                    nut.len(),
                    mesh.n_cells()
                ),
            });
        }
        if let Some(cell) = nut.iter().position(|v| !v.is_finite()) {
            tracing::error!(model = self.turbulence.name(), cell, value = nut[cell], "non-finite nut");
            return Err(SolverError::Divergence {
                what: "nut",
                cell,
                value: nut[cell],
            });
        }
        if self.turbulence.kappat().is_some() {
            tracing::debug!(
                model = self.turbulence.name(),
                "overwriting model conductivity with nut/Prt"
            );
        }

        let prt = self.prt;
        fields
            .kappat
            .internal_mut()
            .par_iter_mut()
            .zip(nut.par_iter())
            .for_each(|(k, &nut)| *k = nut / prt);

        fields.correct_kappat_bcs(mesh)?;
        fields.correct_r_wall_bcs(mesh)?;
        fields.correct_q_wall_bcs(mesh)?;

        for (field, at) in [
            (store::KAPPAT, fields.kappat.find_non_finite()),
            (store::R_WALL, fields.r_wall.find_non_finite()),
            (store::Q_WALL, fields.q_wall.find_non_finite()),
        ] {
            if let Some(at) = at {
                tracing::error!(field, %at, "non-finite closure field");
                return Err(SolverError::NonFiniteField { field, at });
            }
        }

        self.state = ClosureState::Fresh;
        timer.stop_and_log(Some(&REFRESH_TIMING));
        Ok(())
    }
}

impl std::fmt::Debug for ClosureRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureRefresh")
            .field("transport", &self.transport.name())
            .field("turbulence", &self.turbulence.name())
            .field("prt", &self.prt)
            .field("state", &self.state)
            .finish()
    }
}
