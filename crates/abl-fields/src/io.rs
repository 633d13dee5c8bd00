//! JSON field files, one per field, under a time directory.
//!
//! A file holds the cell values (uniform or one per global cell) and one
//! boundary condition per physical patch:
//!
//! ```json
//! {
//!   "name": "T",
//!   "internal": { "uniform": 300.0 },
//!   "boundary": {
//!     "lower": { "type": "fixedValue", "value": 300.0 },
//!     "upper": { "type": "zeroGradient" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use abl_mesh::Mesh;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryCondition;
use crate::error::{FieldError, FieldResult};
use crate::field::VolField;
use crate::value::FieldValue;

/// Cell values as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InternalValues<T> {
    Uniform(T),
    NonUniform(Vec<T>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct FieldFile<T> {
    pub name: String,
    pub internal: InternalValues<T>,
    #[serde(default)]
    pub boundary: BTreeMap<String, BoundaryCondition<T>>,
}

pub fn field_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

impl<T: FieldValue> FieldFile<T> {
    /// Build the field on `mesh`.
    ///
    /// A non-uniform list is indexed by global cell, so the same file serves
    /// every partition. Processor patches are filled in automatically.
    pub fn into_field(self, mesh: &Mesh) -> FieldResult<VolField<T>> {
        let internal = match self.internal {
            InternalValues::Uniform(v) => vec![v; mesh.n_cells()],
            InternalValues::NonUniform(values) => {
                if values.len() != mesh.n_global_cells() {
                    return Err(FieldError::SizeMismatch {
                        field: self.name,
                        what: "internal field",
                        expected: mesh.n_global_cells(),
                        actual: values.len(),
                    });
                }
                mesh.global_cells().iter().map(|&g| values[g]).collect()
            }
        };

        let mut boundary = self.boundary;
        let mut conditions = Vec::with_capacity(mesh.patches().len());
        for patch in mesh.patches() {
            if patch.kind.is_processor() {
                conditions.push(BoundaryCondition::Processor);
                continue;
            }
            let condition = boundary
                .remove(&patch.name)
                .ok_or_else(|| FieldError::MissingPatch {
                    field: self.name.clone(),
                    patch: patch.name.clone(),
                })?;
            if let BoundaryCondition::WallModel(model) = &condition {
                model
                    .validate()
                    .map_err(|reason| FieldError::BoundaryCondition {
                        field: self.name.clone(),
                        patch: patch.name.clone(),
                        condition: model.name(),
                        reason,
                    })?;
            }
            conditions.push(condition);
        }
        for extra in boundary.keys() {
            tracing::warn!(field = %self.name, patch = %extra, "ignoring condition for unknown patch");
        }

        VolField::from_parts(mesh, self.name, internal, conditions)
    }

    /// Snapshot of a field; processor patches are not written.
    pub fn from_field(mesh: &Mesh, field: &VolField<T>) -> Self {
        let boundary = mesh
            .patches()
            .iter()
            .zip(field.patches())
            .filter(|(patch, _)| !patch.kind.is_processor())
            .map(|(patch, pf)| (patch.name.clone(), pf.condition().clone()))
            .collect();
        Self {
            name: field.name().to_string(),
            internal: InternalValues::NonUniform(field.internal().to_vec()),
            boundary,
        }
    }
}

/// Read `<dir>/<name>.json`. `Ok(None)` if the file does not exist.
pub fn read_field<T: FieldValue>(
    mesh: &Mesh,
    dir: &Path,
    name: &str,
) -> FieldResult<Option<VolField<T>>> {
    let path = field_path(dir, name);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let file: FieldFile<T> = serde_json::from_str(&content)?;
    tracing::debug!(field = name, path = %path.display(), kind = T::KIND, "read field");
    file.into_field(mesh).map(Some)
}

/// Read a field that must exist.
pub fn read_required<T: FieldValue>(mesh: &Mesh, dir: &Path, name: &str) -> FieldResult<VolField<T>> {
    read_field(mesh, dir, name)?.ok_or_else(|| FieldError::MissingField {
        name: name.to_string(),
        path: field_path(dir, name).display().to_string(),
    })
}

pub fn write_field<T: FieldValue>(mesh: &Mesh, dir: &Path, field: &VolField<T>) -> FieldResult<()> {
    fs::create_dir_all(dir)?;
    let path = field_path(dir, field.name());
    let json = serde_json::to_string_pretty(&FieldFile::from_field(mesh, field))?;
    fs::write(&path, json)?;
    tracing::debug!(field = field.name(), path = %path.display(), "wrote field");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::WallModel;
    use abl_core::{Real, SymmTensor, Vec3};
    use abl_mesh::BoxMeshBuilder;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("abl-fields-io-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn all_zero_gradient<T>(mesh: &Mesh) -> BTreeMap<String, BoundaryCondition<T>> {
        mesh.patches()
            .iter()
            .map(|p| (p.name.clone(), BoundaryCondition::ZeroGradient))
            .collect()
    }

    #[test]
    fn non_uniform_values_map_through_global_cells() {
        let builder = BoxMeshBuilder::new([4, 1, 1], [4.0, 1.0, 1.0]);
        let parts = builder.decompose(2).unwrap();
        let serial = builder.build().unwrap();
        let file = FieldFile {
            name: "T".to_string(),
            internal: InternalValues::NonUniform(vec![10.0, 11.0, 12.0, 13.0]),
            boundary: all_zero_gradient::<Real>(&serial),
        };
        let right = file.into_field(&parts[1]).unwrap();
        assert_eq!(right.internal(), &[12.0, 13.0]);
        let proc = parts[1].patch_by_name("procBoundary1to0").unwrap();
        assert_eq!(
            right.patch_field(proc.id).unwrap().condition(),
            &BoundaryCondition::Processor
        );
    }

    #[test]
    fn missing_patch_is_reported() {
        let mesh = BoxMeshBuilder::new([1, 1, 1], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let mut boundary = all_zero_gradient::<Real>(&mesh);
        boundary.remove("upper");
        let file = FieldFile {
            name: "T".to_string(),
            internal: InternalValues::Uniform(300.0),
            boundary,
        };
        let err = file.into_field(&mesh).unwrap_err();
        assert!(matches!(err, FieldError::MissingPatch { ref patch, .. } if patch == "upper"));
    }

    #[test]
    fn non_positive_roughness_is_rejected_on_load() {
        let mesh = BoxMeshBuilder::new([1, 1, 1], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let mut boundary = all_zero_gradient::<SymmTensor>(&mesh);
        boundary.insert(
            "lower".to_string(),
            BoundaryCondition::WallModel(WallModel::SchumannGrotzbach {
                z0: 0.0,
                kappa: 0.41,
            }),
        );
        let file = FieldFile {
            name: "Rwall".to_string(),
            internal: InternalValues::Uniform(SymmTensor::ZERO),
            boundary,
        };
        let err = file.into_field(&mesh).unwrap_err();
        assert!(matches!(
            err,
            FieldError::BoundaryCondition {
                condition: "SchumannGrotzbach",
                ref patch,
                ..
            } if patch == "lower"
        ));
    }

    #[test]
    fn wrong_length_is_a_size_mismatch() {
        let mesh = BoxMeshBuilder::new([2, 1, 1], [2.0, 1.0, 1.0])
            .build()
            .unwrap();
        let file = FieldFile {
            name: "T".to_string(),
            internal: InternalValues::NonUniform(vec![1.0, 2.0, 3.0]),
            boundary: all_zero_gradient::<Real>(&mesh),
        };
        assert!(matches!(
            file.into_field(&mesh),
            Err(FieldError::SizeMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn write_then_read_preserves_values() {
        let dir = temp_dir("rw");
        let mesh = BoxMeshBuilder::new([2, 2, 1], [2.0, 2.0, 1.0])
            .build()
            .unwrap();
        let mut u = VolField::uniform(&mesh, "U", Vec3::new(1.0, 0.0, 0.0), |_| {
            BoundaryCondition::ZeroGradient
        });
        u.internal_mut()[2] = Vec3::new(0.0, 2.0, 0.0);
        write_field(&mesh, &dir, &u).unwrap();
        let back: VolField<Vec3> = read_required(&mesh, &dir, "U").unwrap();
        assert_eq!(back.internal(), u.internal());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn absent_file_is_none_or_missing_field() {
        let dir = temp_dir("absent");
        let mesh = BoxMeshBuilder::new([1, 1, 1], [1.0, 1.0, 1.0])
            .build()
            .unwrap();
        assert!(read_field::<Real>(&mesh, &dir, "T").unwrap().is_none());
        assert!(matches!(
            read_required::<Real>(&mesh, &dir, "T"),
            Err(FieldError::MissingField { .. })
        ));
    }
}
