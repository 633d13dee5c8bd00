//! SI quantities used where the case file hands physical values to the solver.
//!
//! Inside the numerics everything is plain `Real` in SI base units; these
//! types only guard the configuration boundary.

use uom::si::f64::{
    KinematicViscosity, Length as UomLength, Ratio as UomRatio, ThermodynamicTemperature,
    Time as UomTime,
};

pub type KinVisc = KinematicViscosity;
pub type Length = UomLength;
pub type Ratio = UomRatio;
pub type Temperature = ThermodynamicTemperature;
pub type Time = UomTime;

macro_rules! si_constructor {
    ($(#[$doc:meta])* $fn:ident -> $ty:ident, $unit:path) => {
        $(#[$doc])*
        #[inline]
        pub fn $fn(v: f64) -> $ty {
            $ty::new::<$unit>(v)
        }
    };
}

si_constructor!(
    /// Kelvin.
    k -> Temperature, uom::si::thermodynamic_temperature::kelvin
);
si_constructor!(m -> Length, uom::si::length::meter);
si_constructor!(m2ps -> KinVisc, uom::si::kinematic_viscosity::square_meter_per_second);
si_constructor!(s -> Time, uom::si::time::second);
si_constructor!(
    /// Dimensionless numbers such as the Prandtl numbers.
    unitless -> Ratio, uom::si::ratio::ratio
);

pub mod constants {
    /// Standard gravity [m/s2].
    pub const G0_MPS2: f64 = 9.806_65;

    /// Sidereal day [s], the default planetary rotation period.
    pub const SIDEREAL_DAY_S: f64 = 86_164.09;

    /// von Karman constant.
    pub const KAPPA_VK: f64 = 0.41;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_stored_in_si() {
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(m(2.0).value, 2.0);
        assert_eq!(m2ps(1.5e-5).value, 1.5e-5);
        assert_eq!(s(86_400.0).value, 86_400.0);
        assert_eq!(unitless(0.7).value, 0.7);
    }

    #[test]
    fn temperatures_compare_in_kelvin() {
        assert!(k(299.0) < k(300.0));
    }
}
