//! Cell-centred fields with per-patch boundary values.

use core::fmt;

use abl_core::PatchId;
use abl_mesh::{Mesh, Patch};

use crate::boundary::{self, BoundaryCondition, PatchContext};
use crate::error::{FieldError, FieldResult};
use crate::value::FieldValue;

/// How a field is obtained when the store is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoPolicy {
    /// The field file must exist; absence is fatal.
    MustRead,
    /// Read the file if present, otherwise build the default.
    ReadIfPresent,
    /// Never read; the field is derived from others.
    #[default]
    NoRead,
}

/// Whether the field is written at checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteOption {
    AutoWrite,
    #[default]
    NoWrite,
}

/// Location of a non-finite field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFiniteAt {
    Cell(usize),
    /// `face` counts from the start of the patch.
    Face { patch: PatchId, face: usize },
}

impl fmt::Display for NonFiniteAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonFiniteAt::Cell(cell) => write!(f, "cell {cell}"),
            NonFiniteAt::Face { patch, face } => write!(f, "face {face} of patch {patch}"),
        }
    }
}

/// Boundary condition and face values of one patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchField<T> {
    condition: BoundaryCondition<T>,
    values: Vec<T>,
}

impl<T: FieldValue> PatchField<T> {
    pub fn condition(&self) -> &BoundaryCondition<T> {
        &self.condition
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// A field with one value per control volume and one per boundary face.
#[derive(Debug, Clone, PartialEq)]
pub struct VolField<T> {
    name: String,
    io: IoPolicy,
    write: WriteOption,
    internal: Vec<T>,
    patches: Vec<PatchField<T>>,
}

impl<T: FieldValue> VolField<T> {
    /// Uniform field. `condition_for` picks the condition of each physical patch;
    /// processor patches always get [`BoundaryCondition::Processor`].
    pub fn uniform(
        mesh: &Mesh,
        name: impl Into<String>,
        value: T,
        condition_for: impl Fn(&Patch) -> BoundaryCondition<T>,
    ) -> Self {
        let conditions = mesh
            .patches()
            .iter()
            .map(|p| {
                if p.kind.is_processor() {
                    BoundaryCondition::Processor
                } else {
                    condition_for(p)
                }
            })
            .collect();
        Self::assemble(mesh, name.into(), vec![value; mesh.n_cells()], conditions)
    }

    /// Field from explicit cell values and one condition per mesh patch.
    pub fn from_parts(
        mesh: &Mesh,
        name: impl Into<String>,
        internal: Vec<T>,
        conditions: Vec<BoundaryCondition<T>>,
    ) -> FieldResult<Self> {
        let name = name.into();
        if internal.len() != mesh.n_cells() {
            return Err(FieldError::SizeMismatch {
                field: name,
                what: "internal field",
                expected: mesh.n_cells(),
                actual: internal.len(),
            });
        }
        if conditions.len() != mesh.patches().len() {
            return Err(FieldError::SizeMismatch {
                field: name,
                what: "boundary conditions",
                expected: mesh.patches().len(),
                actual: conditions.len(),
            });
        }
        Ok(Self::assemble(mesh, name, internal, conditions))
    }

    fn assemble(
        mesh: &Mesh,
        name: String,
        internal: Vec<T>,
        conditions: Vec<BoundaryCondition<T>>,
    ) -> Self {
        let owner = mesh.owner();
        let patches = mesh
            .patches()
            .iter()
            .zip(conditions)
            .map(|(patch, condition)| {
                let values = patch
                    .faces()
                    .map(|face| match &condition {
                        BoundaryCondition::FixedValue { value } => *value,
                        BoundaryCondition::WallModel(_) => T::zero(),
                        _ => internal[owner[face]],
                    })
                    .collect();
                PatchField { condition, values }
            })
            .collect();
        Self {
            name,
            io: IoPolicy::default(),
            write: WriteOption::default(),
            internal,
            patches,
        }
    }

    pub fn with_io(mut self, io: IoPolicy, write: WriteOption) -> Self {
        self.io = io;
        self.write = write;
        self
    }

    /// Copy of this field under another name, conditions included.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn io(&self) -> IoPolicy {
        self.io
    }

    pub fn write_option(&self) -> WriteOption {
        self.write
    }

    pub fn internal(&self) -> &[T] {
        &self.internal
    }

    pub fn internal_mut(&mut self) -> &mut [T] {
        &mut self.internal
    }

    pub fn patches(&self) -> &[PatchField<T>] {
        &self.patches
    }

    pub fn patch_field(&self, id: PatchId) -> Option<&PatchField<T>> {
        self.patches.get(id.as_usize())
    }

    /// Replace the condition of one patch and re-seed its face values.
    pub fn set_condition(
        &mut self,
        mesh: &Mesh,
        id: PatchId,
        condition: BoundaryCondition<T>,
    ) -> FieldResult<()> {
        let patch = mesh.patch(id).ok_or_else(|| FieldError::MissingPatch {
            field: self.name.clone(),
            patch: id.to_string(),
        })?;
        let owner = mesh.owner();
        let internal = &self.internal;
        let pf = &mut self.patches[id.as_usize()];
        pf.values = patch
            .faces()
            .map(|face| match &condition {
                BoundaryCondition::FixedValue { value } => *value,
                BoundaryCondition::WallModel(_) => T::zero(),
                _ => internal[owner[face]],
            })
            .collect();
        pf.condition = condition;
        Ok(())
    }

    /// Re-evaluate every patch from the current cell values and `ctx`.
    pub fn correct_boundary_conditions(&mut self, ctx: &PatchContext<'_>) -> FieldResult<()> {
        let internal = &self.internal;
        for (patch, pf) in ctx.mesh.patches().iter().zip(self.patches.iter_mut()) {
            boundary::evaluate(&pf.condition, patch, internal, ctx, &mut pf.values).map_err(
                |e| match e {
                    FieldError::BoundaryCondition {
                        condition, reason, ..
                    } => FieldError::BoundaryCondition {
                        field: self.name.clone(),
                        patch: patch.name.clone(),
                        condition,
                        reason,
                    },
                    other => other,
                },
            )?;
        }
        Ok(())
    }

    /// True if any patch pins the level of this field.
    pub fn fixes_value(&self, ctx: &PatchContext<'_>, update_fixes_value: bool) -> bool {
        ctx.mesh
            .patches()
            .iter()
            .zip(&self.patches)
            .any(|(patch, pf)| pf.condition.fixes_value(patch, ctx, update_fixes_value))
    }

    /// Add a constant to every cell and boundary face value.
    pub fn add_uniform(&mut self, shift: T) {
        for v in self.internal.iter_mut() {
            *v = *v + shift;
        }
        for pf in self.patches.iter_mut() {
            for v in pf.values.iter_mut() {
                *v = *v + shift;
            }
        }
    }

    /// Pointwise function of this field, with `calculated` physical patches.
    pub fn derived<U: FieldValue>(&self, name: impl Into<String>, f: impl Fn(T) -> U) -> VolField<U> {
        let patches = self
            .patches
            .iter()
            .map(|pf| PatchField {
                condition: match pf.condition {
                    BoundaryCondition::Processor => BoundaryCondition::Processor,
                    _ => BoundaryCondition::Calculated,
                },
                values: pf.values.iter().map(|&v| f(v)).collect(),
            })
            .collect();
        VolField {
            name: name.into(),
            io: IoPolicy::NoRead,
            write: WriteOption::NoWrite,
            internal: self.internal.iter().map(|&v| f(v)).collect(),
            patches,
        }
    }

    /// Set every cell value from `cell(i)` and every boundary face value from
    /// `face(f)`, where `f` is the mesh face index.
    pub fn fill_with(
        &mut self,
        mesh: &Mesh,
        cell: impl Fn(usize) -> T,
        face: impl Fn(usize) -> T,
    ) {
        for (i, v) in self.internal.iter_mut().enumerate() {
            *v = cell(i);
        }
        for (patch, pf) in mesh.patches().iter().zip(self.patches.iter_mut()) {
            for (v, f) in pf.values.iter_mut().zip(patch.faces()) {
                *v = face(f);
            }
        }
    }

    /// Value on boundary face `face` (mesh face index), if it is one.
    pub fn boundary_value(&self, mesh: &Mesh, face: usize) -> Option<T> {
        mesh.patches()
            .iter()
            .zip(&self.patches)
            .find(|(patch, _)| patch.faces().contains(&face))
            .map(|(patch, pf)| pf.values[face - patch.start])
    }

    /// Overwrite values from `other` without replacing this field object.
    pub fn assign(&mut self, other: &VolField<T>) -> FieldResult<()> {
        if other.internal.len() != self.internal.len() {
            return Err(FieldError::SizeMismatch {
                field: self.name.clone(),
                what: "assigned internal field",
                expected: self.internal.len(),
                actual: other.internal.len(),
            });
        }
        self.internal.copy_from_slice(&other.internal);
        for (dst, src) in self.patches.iter_mut().zip(&other.patches) {
            dst.values.copy_from_slice(&src.values);
        }
        Ok(())
    }

    /// First non-finite value, cells before boundary faces.
    pub fn find_non_finite(&self) -> Option<NonFiniteAt> {
        if let Some(cell) = self.internal.iter().position(|v| !v.is_finite()) {
            return Some(NonFiniteAt::Cell(cell));
        }
        self.patches.iter().enumerate().find_map(|(p, pf)| {
            pf.values
                .iter()
                .position(|v| !v.is_finite())
                .map(|face| NonFiniteAt::Face {
                    patch: PatchId::from_index(p as u32),
                    face,
                })
        })
    }

    /// Fail on the first non-finite cell or boundary face value.
    pub fn check_finite(&self) -> FieldResult<()> {
        if let Some(at) = self.find_non_finite() {
            tracing::error!(field = %self.name, %at, "non-finite value");
            return Err(abl_core::AblError::NonFinite {
                what: "field value",
                value: f64::NAN,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abl_core::Real;
    use abl_mesh::BoxMeshBuilder;

    fn mesh() -> Mesh {
        BoxMeshBuilder::new([2, 2, 2], [2.0, 2.0, 2.0])
            .build()
            .unwrap()
    }

    fn fixed_lower(p: &Patch) -> BoundaryCondition<Real> {
        if p.name == "lower" {
            BoundaryCondition::FixedValue { value: 1.0 }
        } else {
            BoundaryCondition::ZeroGradient
        }
    }

    #[test]
    fn uniform_seeds_boundary_values() {
        let mesh = mesh();
        let t = VolField::uniform(&mesh, "T", 300.0, fixed_lower);
        let lower = mesh.patch_by_name("lower").unwrap();
        let upper = mesh.patch_by_name("upper").unwrap();
        assert!(t.patch_field(lower.id).unwrap().values().iter().all(|&v| v == 1.0));
        assert!(t.patch_field(upper.id).unwrap().values().iter().all(|&v| v == 300.0));
    }

    #[test]
    fn zero_gradient_follows_cells_after_correction() {
        let mesh = mesh();
        let mut t = VolField::uniform(&mesh, "T", 300.0, fixed_lower);
        for (i, v) in t.internal_mut().iter_mut().enumerate() {
            *v = i as Real;
        }
        t.correct_boundary_conditions(&PatchContext::new(&mesh)).unwrap();
        let upper = mesh.patch_by_name("upper").unwrap();
        for (face, v) in upper.faces().zip(t.patch_field(upper.id).unwrap().values()) {
            assert_eq!(*v, mesh.owner()[face] as Real);
        }
    }

    #[test]
    fn fixes_value_detects_dirichlet_patch() {
        let mesh = mesh();
        let ctx = PatchContext::new(&mesh);
        let pinned = VolField::uniform(&mesh, "p_rgh", 0.0, fixed_lower);
        let floating = VolField::uniform(&mesh, "p_rgh", 0.0, |_| BoundaryCondition::ZeroGradient);
        assert!(pinned.fixes_value(&ctx, false));
        assert!(!floating.fixes_value(&ctx, false));
    }

    #[test]
    fn add_uniform_shifts_cells_and_faces() {
        let mesh = mesh();
        let mut p = VolField::uniform(&mesh, "p", 5.0, |_| BoundaryCondition::ZeroGradient);
        p.add_uniform(-5.0);
        assert!(p.internal().iter().all(|&v| v == 0.0));
        assert!(p.patches().iter().all(|pf| pf.values().iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn from_parts_rejects_wrong_length() {
        let mesh = mesh();
        let err = VolField::<Real>::from_parts(&mesh, "T", vec![0.0; 3], vec![]).unwrap_err();
        assert!(matches!(err, FieldError::SizeMismatch { expected: 8, actual: 3, .. }));
    }

    #[test]
    fn check_finite_flags_nan() {
        let mesh = mesh();
        let mut k = VolField::uniform(&mesh, "kappat", 0.0, |_| BoundaryCondition::Calculated);
        assert!(k.check_finite().is_ok());
        k.internal_mut()[3] = Real::NAN;
        assert!(k.check_finite().is_err());
        assert_eq!(k.find_non_finite(), Some(NonFiniteAt::Cell(3)));
    }

    #[test]
    fn check_finite_covers_boundary_faces() {
        let mesh = mesh();
        let lower = mesh.patch_by_name("lower").unwrap().id;
        let mut k = VolField::uniform(&mesh, "kappat", 0.0, |_| BoundaryCondition::Calculated);
        k.set_condition(
            &mesh,
            lower,
            BoundaryCondition::FixedValue {
                value: Real::INFINITY,
            },
        )
        .unwrap();
        assert!(k.check_finite().is_err());
        assert_eq!(
            k.find_non_finite(),
            Some(NonFiniteAt::Face {
                patch: lower,
                face: 0
            })
        );
    }
}
