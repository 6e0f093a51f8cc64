//! Cells: the structural operations that drive signals.

use crate::ids::{CellId, SignalId};
use crate::port::PortDirection;
use bitgrid_common::{Ident, LogicVec};
use serde::{Deserialize, Serialize};

/// The operation a cell performs.
///
/// Only bit plumbing exists here; there is no arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    /// Constant value source.
    Const {
        /// The constant value.
        value: LogicVec,
    },
    /// Bit slice extraction (`A[offset +: width]`).
    Slice {
        /// Starting bit offset.
        offset: u32,
        /// Width of the slice in bits.
        width: u32,
    },
    /// Bit concatenation; the first input is most significant.
    Concat,
    /// Pass-through buffer. Used for named barrier wires.
    Buf,
    /// Reinterprets the input bits under another type of equal width.
    Bitcast,
}

impl CellKind {
    /// Short mnemonic used in the textual dump.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            CellKind::Const { .. } => "const",
            CellKind::Slice { .. } => "slice",
            CellKind::Concat => "concat",
            CellKind::Buf => "buf",
            CellKind::Bitcast => "bitcast",
        }
    }
}

/// A connection between a cell pin and a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// The name of the pin on the cell.
    pub port_name: Ident,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The connected signal.
    pub signal: SignalId,
}

/// A cell instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// The unique ID of this cell within its module.
    pub id: CellId,
    /// The cell instance name.
    pub name: Ident,
    /// What the cell does.
    pub kind: CellKind,
    /// Pin connections: inputs in operand order, then the single output.
    pub connections: Vec<Connection>,
}

impl Cell {
    /// Returns the input signals in operand order.
    pub fn inputs(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.connections
            .iter()
            .filter(|c| c.direction == PortDirection::Input)
            .map(|c| c.signal)
    }

    /// Returns the driven signal.
    pub fn output(&self) -> Option<SignalId> {
        self.connections
            .iter()
            .find(|c| c.direction == PortDirection::Output)
            .map(|c| c.signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(raw: u32, direction: PortDirection, sig: u32) -> Connection {
        Connection {
            port_name: Ident::from_raw(raw),
            direction,
            signal: SignalId::from_raw(sig),
        }
    }

    #[test]
    fn inputs_keep_operand_order() {
        let cell = Cell {
            id: CellId::from_raw(0),
            name: Ident::from_raw(0),
            kind: CellKind::Concat,
            connections: vec![
                conn(1, PortDirection::Input, 5),
                conn(2, PortDirection::Input, 3),
                conn(3, PortDirection::Output, 9),
            ],
        };
        let ins: Vec<u32> = cell.inputs().map(|s| s.as_raw()).collect();
        assert_eq!(ins, vec![5, 3]);
        assert_eq!(cell.output(), Some(SignalId::from_raw(9)));
    }

    #[test]
    fn mnemonics() {
        assert_eq!(CellKind::Concat.mnemonic(), "concat");
        assert_eq!(
            CellKind::Slice {
                offset: 0,
                width: 1
            }
            .mnemonic(),
            "slice"
        );
        assert_eq!(
            CellKind::Const {
                value: LogicVec::from_bool(true)
            }
            .mnemonic(),
            "const"
        );
    }

    #[test]
    fn cell_serde_roundtrip() {
        let cell = Cell {
            id: CellId::from_raw(1),
            name: Ident::from_raw(0),
            kind: CellKind::Slice {
                offset: 8,
                width: 8,
            },
            connections: vec![conn(0, PortDirection::Output, 2)],
        };
        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, cell.kind);
    }
}
