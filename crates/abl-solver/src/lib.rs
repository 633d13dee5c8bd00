//! abl-solver: setup and per-iteration closure refresh of the ABL solver.
//!
//! Setup resolves whether the pressure needs a reference cell, anchors the
//! Boussinesq buoyancy at the reference height and shifts the pressure level
//! to the reference value. During time stepping [`ClosureRefresh`] re-derives
//! the turbulent conductivity and wall fluxes before each flow solve.

pub mod buoyancy;
pub mod closure;
pub mod comm;
pub mod error;
pub mod pressure_level;
pub mod reference;
pub mod setup;

#[cfg(test)]
mod testing;

pub use buoyancy::BuoyancyModel;
pub use closure::{ClosureRefresh, ClosureState, REFRESH_TIMING};
pub use comm::{Communicator, SerialComm, ThreadComm, run_partitioned};
pub use error::{SolverError, SolverResult};
pub use pressure_level::{adjust_pressure_level, update_p_from_p_rgh};
pub use reference::{PressureReference, resolve_pressure_reference};
pub use setup::{AblSolver, build_partition, setup, setup_with_fields};
