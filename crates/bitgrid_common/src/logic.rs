//! Four-state logic values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One bit of a constant.
///
/// Array operations only ever produce `Zero` and `One`; `X` and `Z` are kept
/// so constants handed in from outside are reported as written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logic {
    /// Low.
    Zero,
    /// High.
    One,
    /// Unknown.
    X,
    /// High impedance.
    Z,
}

impl Logic {
    /// `One` for `true`, `Zero` for `false`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'X',
            Logic::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools_map_to_known_values() {
        assert_eq!(Logic::from_bool(true), Logic::One);
        assert_eq!(Logic::from_bool(false), Logic::Zero);
    }

    #[test]
    fn display_chars() {
        let s: String = [Logic::One, Logic::Zero, Logic::X, Logic::Z]
            .iter()
            .map(Logic::to_string)
            .collect();
        assert_eq!(s, "10XZ");
    }
}
