//! Element types.

use crate::error::{NdError, NdResult};
use bitgrid_ir::{ModuleBuilder, TypeId};
use std::fmt;

/// The element type of an array: a bit vector of fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dtype {
    width: u32,
}

impl Dtype {
    /// A single bit.
    pub const I1: Dtype = Dtype { width: 1 };
    /// An 8-bit vector.
    pub const I8: Dtype = Dtype { width: 8 };
    /// A 16-bit vector.
    pub const I16: Dtype = Dtype { width: 16 };
    /// A 32-bit vector.
    pub const I32: Dtype = Dtype { width: 32 };
    /// A 64-bit vector.
    pub const I64: Dtype = Dtype { width: 64 };

    /// A `width`-bit vector; zero widths are rejected.
    pub fn bits(width: u32) -> NdResult<Self> {
        if width == 0 {
            return Err(NdError::Width("dtype width must be at least 1".to_string()));
        }
        Ok(Self { width })
    }

    /// The element width in bits.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Interns the matching IR type.
    pub fn ir_type(self, ir: &mut ModuleBuilder<'_>) -> TypeId {
        ir.types.bits(self.width)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.width)
    }
}
