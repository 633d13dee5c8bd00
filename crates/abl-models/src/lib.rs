//! abl-models: transport and turbulence closures plus volumetric sources.

pub mod error;
pub mod sources;
pub mod transport;
pub mod turbulence;

pub use error::{ModelError, ModelResult};
pub use sources::{CoriolisForce, DrivingForce};
pub use transport::{Newtonian, TransportModel, new_transport};
pub use turbulence::{
    ConstantEddyViscosity, Laminar, Smagorinsky, StabilitySmagorinsky, TurbulenceModel,
    new_turbulence,
};
