//! The set of working fields of the solver.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use abl_core::{Real, SymmTensor, Vec3};
use abl_mesh::Mesh;

use crate::boundary::PatchContext;
use crate::error::{FieldError, FieldResult};
use crate::field::{IoPolicy, VolField, WriteOption};
use crate::io;
use crate::surface::SurfaceField;

pub const T: &str = "T";
pub const P_RGH: &str = "p_rgh";
pub const P: &str = "p";
pub const U: &str = "U";
pub const PHI: &str = "phi";
pub const KAPPAT: &str = "kappat";
pub const R_WALL: &str = "Rwall";
pub const Q_WALL: &str = "qwall";

/// Owns every field. Fields are public so callers can borrow disjoint
/// fields at once (e.g. read `u` while correcting `r_wall`).
#[derive(Debug, Clone)]
pub struct FieldStore {
    /// Potential temperature [K].
    pub t: VolField<Real>,
    /// Density-normalised modified pressure [m2/s2].
    pub p_rgh: VolField<Real>,
    /// Density-normalised pressure [m2/s2], derived from `p_rgh`.
    pub p: VolField<Real>,
    /// Velocity [m/s].
    pub u: VolField<Vec3>,
    /// Volumetric face flux [m3/s].
    pub phi: SurfaceField,
    /// Kinematic turbulent thermal conductivity [m2/s].
    pub kappat: VolField<Real>,
    /// Wall shear stress [m2/s2].
    pub r_wall: VolField<SymmTensor>,
    /// Wall temperature flux [K m/s].
    pub q_wall: VolField<Vec3>,
    flux_required: BTreeSet<String>,
}

impl FieldStore {
    /// Assemble a store from already built fields.
    ///
    /// `phi` is computed from `u` and `p` starts as a copy of `p_rgh`.
    pub fn from_fields(
        mesh: &Mesh,
        t: VolField<Real>,
        p_rgh: VolField<Real>,
        u: VolField<Vec3>,
        kappat: VolField<Real>,
        r_wall: VolField<SymmTensor>,
        q_wall: VolField<Vec3>,
    ) -> Self {
        let phi = SurfaceField::flux(mesh, &u);
        let p = p_rgh
            .renamed(P)
            .with_io(IoPolicy::NoRead, WriteOption::AutoWrite);
        Self {
            t,
            p_rgh,
            p,
            u,
            phi,
            kappat,
            r_wall,
            q_wall,
            flux_required: BTreeSet::new(),
        }
    }

    /// Read every must-read field from the time directory `dir`.
    pub fn read(mesh: &Mesh, dir: &Path) -> FieldResult<Self> {
        let must = |f: VolField<Real>| f.with_io(IoPolicy::MustRead, WriteOption::AutoWrite);

        tracing::info!("Creating and reading potential temperature field, T");
        let t = must(io::read_required(mesh, dir, T)?);
        tracing::info!("Creating and reading the density-normalized modified pressure field, p_rgh");
        let p_rgh = must(io::read_required(mesh, dir, P_RGH)?);
        tracing::info!("Creating and reading velocity field, U");
        let u = io::read_required(mesh, dir, U)?
            .with_io(IoPolicy::MustRead, WriteOption::AutoWrite);
        tracing::info!("Creating and reading turbulent thermal conductivity field, kappat");
        let kappat = must(io::read_required(mesh, dir, KAPPAT)?);
        tracing::info!("Creating and reading the wall shear stress field, Rwall");
        let r_wall = io::read_required(mesh, dir, R_WALL)?
            .with_io(IoPolicy::MustRead, WriteOption::AutoWrite);
        tracing::info!("Creating and reading the wall temperature flux field, qwall");
        let q_wall = io::read_required(mesh, dir, Q_WALL)?
            .with_io(IoPolicy::MustRead, WriteOption::AutoWrite);

        let mut store = Self::from_fields(mesh, t, p_rgh, u, kappat, r_wall, q_wall);
        tracing::info!("Creating and calculating velocity flux field, phi");
        if let Some(phi) = read_flux(mesh, dir)? {
            store.phi = phi;
        }
        Ok(store)
    }

    /// Write every `AutoWrite` field, plus the flux, into `dir`.
    pub fn write(&self, mesh: &Mesh, dir: &Path) -> FieldResult<()> {
        let auto = |io: WriteOption| io == WriteOption::AutoWrite;
        for f in [&self.t, &self.p_rgh, &self.p, &self.kappat] {
            if auto(f.write_option()) {
                io::write_field(mesh, dir, f)?;
            }
        }
        for f in [&self.u, &self.q_wall] {
            if auto(f.write_option()) {
                io::write_field(mesh, dir, f)?;
            }
        }
        if auto(self.r_wall.write_option()) {
            io::write_field(mesh, dir, &self.r_wall)?;
        }
        fs::create_dir_all(dir)?;
        fs::write(
            io::field_path(dir, PHI),
            serde_json::to_string_pretty(&self.phi)?,
        )?;
        Ok(())
    }

    pub fn scalar(&self, name: &str) -> FieldResult<&VolField<Real>> {
        match name {
            T => Ok(&self.t),
            P_RGH => Ok(&self.p_rgh),
            P => Ok(&self.p),
            KAPPAT => Ok(&self.kappat),
            _ => Err(FieldError::UnknownField {
                name: name.to_string(),
            }),
        }
    }

    pub fn vector(&self, name: &str) -> FieldResult<&VolField<Vec3>> {
        match name {
            U => Ok(&self.u),
            Q_WALL => Ok(&self.q_wall),
            _ => Err(FieldError::UnknownField {
                name: name.to_string(),
            }),
        }
    }

    pub fn tensor(&self, name: &str) -> FieldResult<&VolField<SymmTensor>> {
        match name {
            R_WALL => Ok(&self.r_wall),
            _ => Err(FieldError::UnknownField {
                name: name.to_string(),
            }),
        }
    }

    /// Register a field whose face flux the pressure solve needs.
    pub fn set_flux_required(&mut self, name: &str) -> FieldResult<()> {
        self.scalar(name)?;
        self.flux_required.insert(name.to_string());
        Ok(())
    }

    pub fn flux_required(&self) -> impl Iterator<Item = &str> {
        self.flux_required.iter().map(String::as_str)
    }

    /// Recompute `phi` from the current velocity.
    pub fn update_flux(&mut self, mesh: &Mesh) {
        self.phi = SurfaceField::flux(mesh, &self.u);
    }

    /// Whether any `p_rgh` patch pins the pressure level on this partition.
    pub fn p_rgh_fixes_value(&self, mesh: &Mesh, update_fixes_value: bool) -> bool {
        let ctx = PatchContext::new(mesh).with_flux(&self.phi);
        self.p_rgh.fixes_value(&ctx, update_fixes_value)
    }

    pub fn correct_kappat_bcs(&mut self, mesh: &Mesh) -> FieldResult<()> {
        let ctx = PatchContext::new(mesh).with_flux(&self.phi);
        self.kappat.correct_boundary_conditions(&ctx)
    }

    pub fn correct_r_wall_bcs(&mut self, mesh: &Mesh) -> FieldResult<()> {
        let ctx = PatchContext::new(mesh)
            .with_velocity(self.u.internal())
            .with_temperature(self.t.internal())
            .with_flux(&self.phi);
        self.r_wall.correct_boundary_conditions(&ctx)
    }

    pub fn correct_q_wall_bcs(&mut self, mesh: &Mesh) -> FieldResult<()> {
        let ctx = PatchContext::new(mesh)
            .with_velocity(self.u.internal())
            .with_temperature(self.t.internal())
            .with_flux(&self.phi);
        self.q_wall.correct_boundary_conditions(&ctx)
    }
}

/// A stored flux is used only if it matches the mesh face count.
fn read_flux(mesh: &Mesh, dir: &Path) -> FieldResult<Option<SurfaceField>> {
    let path = io::field_path(dir, PHI);
    if !path.exists() {
        return Ok(None);
    }
    let phi: SurfaceField = serde_json::from_str(&fs::read_to_string(&path)?)?;
    if phi.values().len() != mesh.n_faces() {
        tracing::warn!(
            path = %path.display(),
            expected = mesh.n_faces(),
            actual = phi.values().len(),
            "stored flux does not match mesh, recomputing from U"
        );
        return Ok(None);
    }
    Ok(Some(phi))
}
