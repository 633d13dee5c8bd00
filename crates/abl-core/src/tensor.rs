//! Vector and tensor value types used by the field layer.

use core::ops::{Add, AddAssign, Mul, Neg, Sub};
use nalgebra::{Matrix3, Vector3};

use crate::numeric::Real;

/// Three-component vector (positions, velocities, fluxes).
pub type Vec3 = Vector3<Real>;

/// Full second-rank tensor (velocity gradients).
pub type Tensor = Matrix3<Real>;

/// Symmetric second-rank tensor stored as its six independent components.
///
/// Used for stresses (e.g. the wall shear stress `Rwall`), where a full
/// `Matrix3` would carry three redundant entries per cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymmTensor {
    pub xx: Real,
    pub xy: Real,
    pub xz: Real,
    pub yy: Real,
    pub yz: Real,
    pub zz: Real,
}

impl SymmTensor {
    pub const ZERO: SymmTensor = SymmTensor {
        xx: 0.0,
        xy: 0.0,
        xz: 0.0,
        yy: 0.0,
        yz: 0.0,
        zz: 0.0,
    };

    pub fn new(xx: Real, xy: Real, xz: Real, yy: Real, yz: Real, zz: Real) -> Self {
        Self {
            xx,
            xy,
            xz,
            yy,
            yz,
            zz,
        }
    }

    /// Symmetric part of a full tensor: (T + T^T)/2.
    pub fn symm(t: &Tensor) -> Self {
        Self {
            xx: t[(0, 0)],
            xy: 0.5 * (t[(0, 1)] + t[(1, 0)]),
            xz: 0.5 * (t[(0, 2)] + t[(2, 0)]),
            yy: t[(1, 1)],
            yz: 0.5 * (t[(1, 2)] + t[(2, 1)]),
            zz: t[(2, 2)],
        }
    }

    pub fn trace(&self) -> Real {
        self.xx + self.yy + self.zz
    }

    /// Deviatoric part: T - tr(T)/3 I.
    pub fn dev(&self) -> Self {
        let third = self.trace() / 3.0;
        Self {
            xx: self.xx - third,
            yy: self.yy - third,
            zz: self.zz - third,
            ..*self
        }
    }

    /// Double inner product T:S.
    pub fn double_dot(&self, other: &SymmTensor) -> Real {
        self.xx * other.xx
            + self.yy * other.yy
            + self.zz * other.zz
            + 2.0 * (self.xy * other.xy + self.xz * other.xz + self.yz * other.yz)
    }

    pub fn to_matrix(&self) -> Tensor {
        Matrix3::new(
            self.xx, self.xy, self.xz, self.xy, self.yy, self.yz, self.xz, self.yz, self.zz,
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.xx, self.xy, self.xz, self.yy, self.yz, self.zz]
            .iter()
            .all(|c| c.is_finite())
    }
}

impl Add for SymmTensor {
    type Output = SymmTensor;

    fn add(self, rhs: SymmTensor) -> SymmTensor {
        SymmTensor {
            xx: self.xx + rhs.xx,
            xy: self.xy + rhs.xy,
            xz: self.xz + rhs.xz,
            yy: self.yy + rhs.yy,
            yz: self.yz + rhs.yz,
            zz: self.zz + rhs.zz,
        }
    }
}

impl AddAssign for SymmTensor {
    fn add_assign(&mut self, rhs: SymmTensor) {
        *self = *self + rhs;
    }
}

impl Sub for SymmTensor {
    type Output = SymmTensor;

    fn sub(self, rhs: SymmTensor) -> SymmTensor {
        self + (-rhs)
    }
}

impl Neg for SymmTensor {
    type Output = SymmTensor;

    fn neg(self) -> SymmTensor {
        self * -1.0
    }
}

impl Mul<Real> for SymmTensor {
    type Output = SymmTensor;

    fn mul(self, s: Real) -> SymmTensor {
        SymmTensor {
            xx: self.xx * s,
            xy: self.xy * s,
            xz: self.xz * s,
            yy: self.yy * s,
            yz: self.yz * s,
            zz: self.zz * s,
        }
    }
}
