//! Solver construction: fields, models, pressure reference and buoyancy.

use std::path::Path;

use abl_case::{Case, CaseDef};
use abl_core::{Real, Vec3};
use abl_fields::{FieldStore, store};
use abl_mesh::{BoxMeshBuilder, Mesh};
use abl_models::{CoriolisForce, DrivingForce, new_transport, new_turbulence};

use crate::buoyancy::BuoyancyModel;
use crate::closure::ClosureRefresh;
use crate::comm::Communicator;
use crate::error::{SolverError, SolverResult};
use crate::pressure_level::{adjust_pressure_level, update_p_from_p_rgh};
use crate::reference::{PressureReference, resolve_pressure_reference};

/// Everything the outer time loop needs, for one partition.
#[derive(Debug)]
pub struct AblSolver {
    pub mesh: Mesh,
    pub fields: FieldStore,
    pub reference: PressureReference,
    pub buoyancy: BuoyancyModel,
    pub closure: ClosureRefresh,
    pub coriolis: CoriolisForce,
    pub momentum_source: DrivingForce<Vec3>,
    pub temperature_source: DrivingForce<Real>,
    /// Shift applied to `p` and `p_rgh` by the pressure level adjustment.
    pub pressure_shift: Real,
    pub update_fixes_value: bool,
    /// Laminar Prandtl number.
    pub pr: Real,
}

impl AblSolver {
    /// Run one closure refresh.
    pub fn refresh(&mut self) -> SolverResult<()> {
        self.closure.refresh(&self.mesh, &mut self.fields)
    }

    /// The flow solve advanced; the closure has to be refreshed.
    ///
    /// `phi` belongs to the flow solve and is left as it is.
    pub fn mark_stale(&mut self) {
        self.closure.mark_stale();
    }

    pub fn write(&self, dir: &Path) -> SolverResult<()> {
        self.fields.write(&self.mesh, dir)?;
        Ok(())
    }
}

/// The mesh partition owned by `comm.rank()`.
pub fn build_partition(def: &CaseDef, comm: &dyn Communicator) -> SolverResult<Mesh> {
    let builder = BoxMeshBuilder::new(def.mesh.cells, def.mesh.lengths)
        .origin(Vec3::from(def.mesh.origin));
    if comm.size() == 1 {
        return Ok(builder.build()?);
    }
    builder
        .decompose(comm.size())?
        .into_iter()
        .nth(comm.rank())
        .ok_or_else(|| SolverError::Invariant {
            what: format!("no partition for rank {}", comm.rank()),
        })
}

/// Build the partition, read its fields from the start time and set up.
pub fn setup(case: &Case, comm: &dyn Communicator) -> SolverResult<AblSolver> {
    let mesh = build_partition(&case.def, comm)?;
    tracing::info!(
        rank = comm.rank(),
        cells = mesh.n_cells(),
        global_cells = mesh.n_global_cells(),
        "Created mesh partition"
    );
    let fields = FieldStore::read(&mesh, &case.start_dir())?;
    setup_with_fields(&case.def, mesh, fields, comm)
}

/// Set up from fields that are already in memory.
pub fn setup_with_fields(
    def: &CaseDef,
    mesh: Mesh,
    mut fields: FieldStore,
    comm: &dyn Communicator,
) -> SolverResult<AblSolver> {
    let update_fixes_value = def.abl.update_fixes_value;

    tracing::info!("Creating and reading laminar transport properties");
    let transport = new_transport(&def.transport, &mesh)?;
    let t_ref = def.transport.t_ref();
    let pr = def.transport.pr().value;
    let prt = def.transport.prt();

    tracing::info!("Creating and reading turbulent transport properties");
    let turbulence = new_turbulence(def, &mesh)?;

    tracing::info!("Creating Coriolis force");
    let coriolis = CoriolisForce::from_def(&def.abl)?;

    tracing::info!("Creating and reading volumetric source terms for momentum and temperature");
    let momentum_source = DrivingForce::<Vec3>::momentum(&def.abl.momentum_source);
    let temperature_source = DrivingForce::<Real>::temperature(&def.abl.temperature_source);

    tracing::info!("Setting reference pressure level");
    let reference =
        resolve_pressure_reference(&mesh, &fields, &def.pimple, update_fixes_value, comm)?;

    tracing::info!("Creating the Boussinesq buoyancy model");
    let buoyancy = BuoyancyModel::new(
        &mesh,
        &reference,
        t_ref,
        Vec3::from(def.abl.gravity),
        comm,
    )?;

    tracing::info!("Adjusting the background pressure level to agree with reference level");
    update_p_from_p_rgh(&mesh, &mut fields, &buoyancy);
    let pressure_shift =
        adjust_pressure_level(&mut fields.p, &mut fields.p_rgh, &reference, comm)?;

    fields.set_flux_required(store::P_RGH)?;

    let closure = ClosureRefresh::new(transport, turbulence, prt)?;

    if comm.is_master() {
        tracing::info!(
            needed = reference.needed,
            p_ref_value = reference.value,
            h_ref = ?buoyancy.h_ref(),
            shift = pressure_shift,
            "setup complete"
        );
    }

    Ok(AblSolver {
        mesh,
        fields,
        reference,
        buoyancy,
        closure,
        coriolis,
        momentum_source,
        temperature_source,
        pressure_shift,
        update_fixes_value,
        pr,
    })
}
