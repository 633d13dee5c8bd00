//! Background pressure level.

use abl_core::Real;
use abl_fields::{FieldStore, VolField};
use abl_mesh::Mesh;

use crate::buoyancy::BuoyancyModel;
use crate::comm::Communicator;
use crate::error::{SolverError, SolverResult};
use crate::reference::PressureReference;

/// `p = p_rgh + rhok gh` on cells and boundary faces.
pub fn update_p_from_p_rgh(mesh: &Mesh, fields: &mut FieldStore, buoyancy: &BuoyancyModel) {
    let rhok = buoyancy.rhok(&fields.t);
    let gh = buoyancy.gh(mesh);
    let ghf = buoyancy.ghf(mesh);
    let p_rgh = &fields.p_rgh;
    let cells = p_rgh.internal();
    let rhok_cells = rhok.internal();
    fields.p.fill_with(
        mesh,
        |i| cells[i] + rhok_cells[i] * gh[i],
        |f| {
            let prgh = p_rgh.boundary_value(mesh, f).unwrap_or(0.0);
            let rk = rhok.boundary_value(mesh, f).unwrap_or(1.0);
            prgh + rk * ghf[f]
        },
    );
}

/// Shift `p` and `p_rgh` so that `p` equals the reference value in the
/// reference cell. Returns the shift; zero when no reference is needed.
///
/// The value of `p` in the reference cell is obtained by a sum over all
/// partitions, the owner contributing its value and everyone else zero.
pub fn adjust_pressure_level(
    p: &mut VolField<Real>,
    p_rgh: &mut VolField<Real>,
    reference: &PressureReference,
    comm: &dyn Communicator,
) -> SolverResult<Real> {
    if !reference.needed {
        return Ok(0.0);
    }
    let owned = reference
        .cell
        .map(|cell| (cell, p.internal().get(cell.as_usize()).copied()));
    // Every partition joins the reduction before a missing owner cell is reported.
    let p_at_ref = comm.sum(owned.and_then(|(_, v)| v).unwrap_or(0.0));
    if let Some((cell, None)) = owned {
        return Err(SolverError::Invariant {
            what: format!(
                "reference cell {cell} is not among the {} local cells of p",
                p.internal().len()
            ),
        });
    }
    let shift = reference.value - p_at_ref;
    p.add_uniform(shift);
    p_rgh.add_uniform(shift);
    tracing::debug!(rank = comm.rank(), p_at_ref, shift, "pressure level adjusted");
    Ok(shift)
}
