//! Case validation.

use crate::schema::{AblDef, CaseDef, SourceDef, SourcePoint, TransportDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid source table '{field}': {reason}")]
    InvalidTable { field: String, reason: String },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

pub fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    if case.mesh.cells.contains(&0) {
        return Err(invalid(
            "mesh.cells",
            format!("{:?}", case.mesh.cells),
            "every direction needs at least one cell",
        ));
    }
    for (axis, l) in ["x", "y", "z"].iter().zip(case.mesh.lengths) {
        positive(&format!("mesh.lengths.{axis}"), l)?;
    }

    validate_transport(&case.transport)?;
    validate_abl(&case.abl)?;

    if case.turbulence.nut < 0.0 || !case.turbulence.nut.is_finite() {
        return Err(invalid("turbulence.nut", case.turbulence.nut, "must be non-negative"));
    }
    positive("turbulence.Ck", case.turbulence.ck)?;
    positive("turbulence.Ce", case.turbulence.ce)?;

    if !case.pimple.p_ref_value.is_finite() {
        return Err(invalid("pimple.pRefValue", case.pimple.p_ref_value, "must be finite"));
    }
    // pRefCell is checked against the global cell count only when a reference is needed.
    let n_cells: usize = case.mesh.cells.iter().product();
    if case.pimple.p_ref_cell >= n_cells {
        tracing::warn!(
            p_ref_cell = case.pimple.p_ref_cell,
            n_cells,
            "pRefCell is outside the mesh; setup fails if a pressure reference is needed"
        );
    }
    Ok(())
}

fn validate_transport(t: &TransportDef) -> Result<(), ValidationError> {
    positive("transport.nu", t.nu)?;
    positive("transport.TRef", t.t_ref)?;
    positive("transport.Pr", t.pr)?;
    positive("transport.Prt", t.prt)?;
    Ok(())
}

fn validate_abl(abl: &AblDef) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&abl.latitude) {
        return Err(invalid("abl.latitude", abl.latitude, "must lie in [-90, 90] degrees"));
    }
    positive("abl.planetaryRotationPeriod", abl.planetary_rotation_period)?;
    if abl.gravity.iter().any(|g| !g.is_finite()) {
        return Err(invalid("abl.gravity", format!("{:?}", abl.gravity), "must be finite"));
    }
    validate_table("abl.momentumSource", &abl.momentum_source, |v| {
        v.iter().all(|c| c.is_finite())
    })?;
    validate_table("abl.temperatureSource", &abl.temperature_source, |v| {
        v.is_finite()
    })?;
    Ok(())
}

fn validate_table<T>(
    field: &str,
    source: &SourceDef<T>,
    finite: impl Fn(&T) -> bool,
) -> Result<(), ValidationError> {
    let SourceDef::Given { table } = source else {
        return Ok(());
    };
    let fail = |reason: &str| ValidationError::InvalidTable {
        field: field.to_string(),
        reason: reason.to_string(),
    };
    if table.is_empty() {
        return Err(fail("needs at least one entry"));
    }
    if table
        .iter()
        .any(|SourcePoint { time, value }| !time.is_finite() || !finite(value))
    {
        return Err(fail("entries must be finite"));
    }
    if table.windows(2).any(|w| w[1].time <= w[0].time) {
        return Err(fail("times must be strictly increasing"));
    }
    Ok(())
}
