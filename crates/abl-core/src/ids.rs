//! Typed indices into partition-local mesh arrays.
//!
//! Each id stores `index + 1` in a `NonZeroU32`, so `Option<CellId>` is as
//! small as a bare id and "no reference cell" needs no sentinel value.

use core::fmt;
use core::num::NonZeroU32;

macro_rules! mesh_id {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            /// `None` if `index` does not fit the 32-bit id range.
            pub fn try_from_usize(index: usize) -> Option<Self> {
                u32::try_from(index)
                    .ok()
                    .filter(|&i| i < u32::MAX)
                    .map(Self::from_index)
            }

            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            pub fn as_usize(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

mesh_id!(
    /// Local cell of one mesh partition.
    CellId,
    "cell"
);

mesh_id!(
    /// Boundary patch, in mesh patch order.
    PatchId,
    "patch"
);
