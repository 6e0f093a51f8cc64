//! Opaque ID newtypes for IR entities.
//!
//! Each ID is a thin `u32` wrapper created by [`Arena`](crate::arena::Arena)
//! allocation and used for O(1) lookup.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $sigil:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn at_slot(slot: usize) -> Self {
                Self(slot as u32)
            }

            fn slot(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $sigil, self.0)
            }
        }
    };
}

define_id!(
    /// ID of a signal within a module.
    SignalId,
    "%"
);

define_id!(
    /// ID of a cell within a module.
    CellId,
    "cell"
);

define_id!(
    /// ID of a port on a module.
    PortId,
    "port"
);

define_id!(
    /// ID of an interned type in the [`TypeDb`](crate::types::TypeDb).
    TypeId,
    "!t"
);
