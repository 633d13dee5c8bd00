//! Case file schema.

use abl_core::constants::{G0_MPS2, SIDEREAL_DAY_S};
use abl_core::units::{KinVisc, Length, Ratio, Temperature, Time, k, m, m2ps, s, unitless};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaseDef {
    pub name: String,
    /// Time directory holding the initial fields.
    #[serde(default = "default_start_time")]
    pub start_time: String,
    pub mesh: MeshDef,
    #[serde(default)]
    pub abl: AblDef,
    pub transport: TransportDef,
    #[serde(default)]
    pub turbulence: TurbulenceDef,
    #[serde(default)]
    pub pimple: PimpleDef,
}

fn default_start_time() -> String {
    "0".to_string()
}

/// Structured box mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeshDef {
    pub cells: [usize; 3],
    pub lengths: [f64; 3],
    #[serde(default)]
    pub origin: [f64; 3],
}

impl MeshDef {
    pub fn lengths(&self) -> [Length; 3] {
        self.lengths.map(m)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AblDef {
    /// Let inflow/outflow pressure patches count as fixing the level when
    /// they currently carry inflow.
    #[serde(default)]
    pub update_fixes_value: bool,
    /// Latitude [deg].
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Planetary rotation period [s].
    #[serde(default = "default_rotation_period")]
    pub planetary_rotation_period: f64,
    /// Gravitational acceleration [m/s2].
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
    #[serde(default)]
    pub momentum_source: SourceDef<[f64; 3]>,
    #[serde(default)]
    pub temperature_source: SourceDef<f64>,
}

fn default_latitude() -> f64 {
    45.0
}

fn default_rotation_period() -> f64 {
    SIDEREAL_DAY_S
}

fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, -G0_MPS2]
}

impl Default for AblDef {
    fn default() -> Self {
        Self {
            update_fixes_value: false,
            latitude: default_latitude(),
            planetary_rotation_period: default_rotation_period(),
            gravity: default_gravity(),
            momentum_source: SourceDef::default(),
            temperature_source: SourceDef::default(),
        }
    }
}

impl AblDef {
    pub fn rotation_period(&self) -> Time {
        s(self.planetary_rotation_period)
    }
}

/// Volumetric driving source for momentum or temperature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceDef<T> {
    #[default]
    None,
    /// Piecewise linear in time, held constant outside the table.
    Given { table: Vec<SourcePoint<T>> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcePoint<T> {
    pub time: f64,
    pub value: T,
}

/// Molecular transport properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportDef {
    #[serde(default = "default_transport_model")]
    pub model: String,
    /// Kinematic viscosity [m2/s].
    pub nu: f64,
    /// Reference potential temperature [K].
    #[serde(rename = "TRef")]
    pub t_ref: f64,
    /// Laminar Prandtl number.
    #[serde(rename = "Pr")]
    pub pr: f64,
    /// Turbulent Prandtl number.
    #[serde(rename = "Prt")]
    pub prt: f64,
}

fn default_transport_model() -> String {
    "Newtonian".to_string()
}

impl TransportDef {
    pub fn nu(&self) -> KinVisc {
        m2ps(self.nu)
    }

    pub fn t_ref(&self) -> Temperature {
        k(self.t_ref)
    }

    pub fn pr(&self) -> Ratio {
        unitless(self.pr)
    }

    pub fn prt(&self) -> Ratio {
        unitless(self.prt)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TurbulenceDef {
    #[serde(default = "default_turbulence_model")]
    pub model: String,
    /// Eddy viscosity of `constantEddyViscosity` [m2/s].
    #[serde(default)]
    pub nut: f64,
    #[serde(default = "default_ck", rename = "Ck")]
    pub ck: f64,
    #[serde(default = "default_ce", rename = "Ce")]
    pub ce: f64,
}

fn default_turbulence_model() -> String {
    "laminar".to_string()
}

fn default_ck() -> f64 {
    0.094
}

fn default_ce() -> f64 {
    1.048
}

impl Default for TurbulenceDef {
    fn default() -> Self {
        Self {
            model: default_turbulence_model(),
            nut: 0.0,
            ck: default_ck(),
            ce: default_ce(),
        }
    }
}

/// Pressure reference settings of the pressure-velocity loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PimpleDef {
    /// Global cell index of the reference cell.
    #[serde(default)]
    pub p_ref_cell: usize,
    #[serde(default)]
    pub p_ref_value: f64,
}
