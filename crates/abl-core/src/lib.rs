//! abl-core: shared foundation of the ABL solver crates.
//!
//! - `units`: uom SI types and constructors for case-file quantities
//! - `numeric`: the `Real` type and a finiteness guard
//! - `tensor`: `Vec3` and the symmetric `SymmTensor`
//! - `ids`: typed cell and patch ids
//! - `error`: the workspace-wide [`AblError`]
//! - `timing`: opt-in wall clock timers

pub mod error;
pub mod ids;
pub mod numeric;
pub mod tensor;
pub mod timing;
pub mod units;

pub use error::{AblError, AblResult};
pub use ids::*;
pub use numeric::*;
pub use tensor::*;
pub use units::*;
