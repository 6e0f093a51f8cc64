//! Constant bit patterns carried by constant cells.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-width pattern of [`Logic`] values, least significant first.
///
/// Constants fed into arrays are narrow (a flag, a fill word), so the
/// pattern is kept one value per slot rather than packed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicVec {
    bits: Vec<Logic>,
}

impl LogicVec {
    /// An all-`Zero` pattern of `width` bits.
    pub fn new(width: u32) -> Self {
        Self {
            bits: vec![Logic::Zero; width as usize],
        }
    }

    /// Number of bits.
    pub fn width(&self) -> u32 {
        self.bits.len() as u32
    }

    /// A single-bit pattern.
    pub fn from_bool(value: bool) -> Self {
        Self {
            bits: vec![Logic::from_bool(value)],
        }
    }

    /// The low `width` bits of `value`. Positions at or above 64 read as zero.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let bits = (0..width)
            .map(|i| Logic::from_bool(i < 64 && (value >> i) & 1 == 1))
            .collect();
        Self { bits }
    }

    /// Bits from LSB to MSB.
    pub fn bits(&self) -> impl Iterator<Item = Logic> + '_ {
        self.bits.iter().copied()
    }
}

impl From<Vec<Logic>> for LogicVec {
    fn from(bits: Vec<Logic>) -> Self {
        Self { bits }
    }
}

/// Prints MSB first, the way a sized literal is written.
impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bits.iter().rev().try_for_each(|b| write!(f, "{b}"))
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'b{self}", self.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u64_truncates_and_pads() {
        assert_eq!(LogicVec::from_u64(0xff, 4).to_string(), "1111");
        assert_eq!(LogicVec::from_u64(0b0110, 6).to_string(), "000110");
        let wide = LogicVec::from_u64(u64::MAX, 70);
        assert_eq!(wide.bits().filter(|b| *b == Logic::One).count(), 64);
        assert_eq!(wide.bits().last(), Some(Logic::Zero));
    }

    #[test]
    fn display_is_msb_first() {
        let v = LogicVec::from(vec![Logic::Z, Logic::X, Logic::Zero, Logic::One]);
        assert_eq!(v.width(), 4);
        assert_eq!(v.to_string(), "10XZ");
        assert_eq!(format!("{v:?}"), "4'b10XZ");
        assert_eq!(LogicVec::from_bool(true).to_string(), "1");
        assert_eq!(LogicVec::new(3).to_string(), "000");
    }

    #[test]
    fn serializes_as_a_plain_list() {
        let v = LogicVec::from_u64(0b10, 2);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["Zero","One"]"#);
        let back: LogicVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
