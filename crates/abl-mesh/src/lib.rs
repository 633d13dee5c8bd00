//! abl-mesh: control-volume geometry for ablflow.
//!
//! Provides:
//! - `Mesh`: cell centres/volumes, face addressing and boundary patches
//! - `BoxMeshBuilder`: structured box meshes and slab decomposition
//! - mesh validation on construction
//!
//! # Example
//!
//! ```
//! use abl_mesh::BoxMeshBuilder;
//!
//! let mesh = BoxMeshBuilder::new([4, 3, 2], [400.0, 300.0, 200.0]).build().unwrap();
//! assert_eq!(mesh.n_cells(), 24);
//! assert_eq!(mesh.patches().len(), 6);
//! ```

pub mod builder;
pub mod error;
pub mod mesh;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::BoxMeshBuilder;
pub use error::{MeshError, MeshResult};
pub use mesh::{Mesh, MeshParts, Patch, PatchKind};
