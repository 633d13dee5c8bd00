//! Pressure reference resolution.

use abl_case::PimpleDef;
use abl_core::{CellId, Real};
use abl_fields::FieldStore;
use abl_mesh::Mesh;

use crate::comm::Communicator;
use crate::error::{SolverError, SolverResult};

/// Where and to what value the pressure level is pinned.
///
/// `cell` is the local id of the reference cell on the partition that owns
/// it, and `None` everywhere else. It is also `None` on every partition when
/// no reference is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureReference {
    pub needed: bool,
    pub value: Real,
    pub cell: Option<CellId>,
}

impl PressureReference {
    pub fn is_owner(&self) -> bool {
        self.cell.is_some()
    }
}

/// Decide whether `p_rgh` is determined only up to a constant and, if so,
/// pick the reference cell.
///
/// A reference is needed iff no `p_rgh` patch fixes a value on any partition.
/// No field is modified.
pub fn resolve_pressure_reference(
    mesh: &Mesh,
    fields: &FieldStore,
    pimple: &PimpleDef,
    update_fixes_value: bool,
    comm: &dyn Communicator,
) -> SolverResult<PressureReference> {
    let fixed_here = fields.p_rgh_fixes_value(mesh, update_fixes_value);
    let fixed = comm.any(fixed_here);

    if fixed {
        tracing::debug!(rank = comm.rank(), "p_rgh has a fixed-value boundary, no reference needed");
        return Ok(PressureReference {
            needed: false,
            value: pimple.p_ref_value,
            cell: None,
        });
    }

    let n_cells = mesh.n_global_cells();
    if pimple.p_ref_cell >= n_cells {
        return Err(SolverError::ReferenceCellOutOfRange {
            cell: pimple.p_ref_cell,
            n_cells,
        });
    }

    let cell = mesh.local_cell(pimple.p_ref_cell);
    let owners = comm.sum(if cell.is_some() { 1.0 } else { 0.0 });
    if owners != 1.0 {
        return Err(SolverError::Invariant {
            what: format!(
                "reference cell {} is owned by {owners} partitions",
                pimple.p_ref_cell
            ),
        });
    }

    Ok(PressureReference {
        needed: true,
        value: pimple.p_ref_value,
        cell,
    })
}
