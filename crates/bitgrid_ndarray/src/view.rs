//! Deferred bit-range views of IR values.

use crate::error::NdResult;
use bitgrid_ir::{ModuleBuilder, Value};

/// Bits `[low, low + width)` of an IR value, not yet materialized.
///
/// Elements are stored as views so that reading a range of an input never
/// builds IR on its own; only lowering decides which slices are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitView {
    /// The value the bits come from.
    pub source: Value,
    /// Least significant bit of the view within `source`.
    pub low: u32,
    /// Number of bits.
    pub width: u32,
}

impl BitView {
    /// Views all of `source`.
    pub fn whole(source: Value) -> Self {
        Self {
            source,
            low: 0,
            width: source.width,
        }
    }

    /// A sub-range relative to this view.
    ///
    /// # Panics
    ///
    /// Panics if the range reaches past the end of the view.
    pub fn sub(self, low: u32, width: u32) -> Self {
        assert!(
            low.checked_add(width).is_some_and(|end| end <= self.width),
            "sub-view [{low}, {}) of a {}-bit view",
            u64::from(low) + u64::from(width),
            self.width
        );
        Self {
            source: self.source,
            low: self.low + low,
            width,
        }
    }

    /// Bit `index` of this view.
    pub fn bit(self, index: u32) -> Self {
        self.sub(index, 1)
    }

    /// True when the view spans its entire source.
    pub fn covers_source(&self) -> bool {
        self.low == 0 && self.width == self.source.width
    }

    /// True when `next` starts right above this view in the same signal.
    pub fn is_followed_by(&self, next: &BitView) -> bool {
        self.source.signal == next.source.signal && self.low + self.width == next.low
    }

    /// Extends this view upward by `next`, which must directly follow it.
    pub(crate) fn extend(&mut self, next: &BitView) {
        debug_assert!(self.is_followed_by(next));
        self.width += next.width;
    }

    /// Turns the view into an IR value, slicing only when it is partial.
    pub fn materialize(&self, ir: &mut ModuleBuilder<'_>) -> NdResult<Value> {
        if self.covers_source() {
            return Ok(self.source);
        }
        Ok(ir.slice(self.source, self.low, self.width)?)
    }
}

impl From<Value> for BitView {
    fn from(value: Value) -> Self {
        Self::whole(value)
    }
}
