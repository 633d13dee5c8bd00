//! abl-fields: field storage, boundary conditions and field I/O for ablflow.
//!
//! The [`FieldStore`] owns every working field of the solver. Models and the
//! closure refresh borrow fields from it and mutate them in place, so a
//! field object keeps its identity for the whole run.

pub mod boundary;
pub mod error;
pub mod field;
pub mod io;
pub mod ops;
pub mod store;
pub mod surface;
pub mod value;

pub use boundary::{BoundaryCondition, PatchContext, WallModel};
pub use error::{FieldError, FieldResult};
pub use field::{IoPolicy, NonFiniteAt, PatchField, VolField, WriteOption};
pub use io::{FieldFile, InternalValues};
pub use store::FieldStore;
pub use surface::SurfaceField;
pub use value::FieldValue;
