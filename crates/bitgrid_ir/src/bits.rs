//! Bit provenance: where each bit of a signal ultimately comes from.
//!
//! Slices, concatenations, buffers, and bitcasts only move bits around, so
//! every bit of every signal in this IR is either a bit of an input port or a
//! constant bit. Two values with equal provenance are interchangeable, which
//! is how lowered arrays are compared bit-exactly.

use crate::arena::Arena;
use crate::cell::{Cell, CellKind};
use crate::ids::{CellId, SignalId};
use crate::signal::Signal;
use crate::types::TypeDb;
use bitgrid_common::Logic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The origin of one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitSource {
    /// Bit `bit` of an undriven signal (an input port).
    Input {
        /// The port's backing signal.
        signal: SignalId,
        /// Bit index, LSB = 0.
        bit: u32,
    },
    /// A constant bit.
    Const(Logic),
}

pub(crate) fn resolve_signal(
    root: SignalId,
    signals: &Arena<SignalId, Signal>,
    cells: &Arena<CellId, Cell>,
    types: &TypeDb,
    drivers: &HashMap<SignalId, CellId>,
    memo: &mut HashMap<SignalId, Vec<BitSource>>,
) -> Vec<BitSource> {
    if let Some(bits) = memo.get(&root) {
        return bits.clone();
    }
    let width = types.bit_width(signals[root].ty);
    let bits = match drivers.get(&root).map(|c| &cells[*c]) {
        None => (0..width)
            .map(|bit| BitSource::Input { signal: root, bit })
            .collect(),
        Some(cell) => {
            let mut resolve = |sig| resolve_signal(sig, signals, cells, types, drivers, memo);
            match &cell.kind {
                CellKind::Const { value } => value.bits().map(BitSource::Const).collect(),
                CellKind::Slice { offset, width } => {
                    let src: Vec<BitSource> = cell.inputs().flat_map(&mut resolve).collect();
                    src[*offset as usize..(*offset + *width) as usize].to_vec()
                }
                // Inputs are MSB-first, so the last one supplies bit 0.
                CellKind::Concat => {
                    let inputs: Vec<SignalId> = cell.inputs().collect();
                    inputs.into_iter().rev().flat_map(&mut resolve).collect()
                }
                CellKind::Buf | CellKind::Bitcast => cell.inputs().flat_map(&mut resolve).collect(),
            }
        }
    };
    memo.insert(root, bits.clone());
    bits
}

#[cfg(test)]
mod tests {
    use crate::builder::ModuleBuilder;
    use crate::BitSource;
    use bitgrid_common::{Interner, Logic, LogicVec};

    #[test]
    fn concat_of_slices_swaps_halves() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(4);
        let a = b.input("a", ty);
        let lo = b.slice(a, 0, 2).unwrap();
        let hi = b.slice(a, 2, 2).unwrap();
        // lo becomes the upper half.
        let swapped = b.concat(&[lo, hi]).unwrap();
        let bits = b.resolve_bits(swapped);
        let idx: Vec<u32> = bits
            .iter()
            .map(|s| match s {
                BitSource::Input { bit, .. } => *bit,
                BitSource::Const(_) => unreachable!(),
            })
            .collect();
        assert_eq!(idx, vec![2, 3, 0, 1]);
    }

    #[test]
    fn constants_mix_with_inputs() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(1);
        let a = b.input("a", ty);
        let one = b.constant(LogicVec::from_bool(true)).unwrap();
        let c = b.concat(&[one, a]).unwrap();
        assert_eq!(
            b.resolve_bits(c),
            vec![
                BitSource::Input {
                    signal: a.signal,
                    bit: 0
                },
                BitSource::Const(Logic::One)
            ]
        );
    }

    #[test]
    fn bitcast_is_transparent() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let i8_ty = b.types.bits(8);
        let i2 = b.types.bits(2);
        let arr = b.types.array(i2, &[4]);
        let a = b.input("a", i8_ty);
        let cast = b.bitcast(a, arr).unwrap();
        assert_eq!(b.resolve_bits(cast), b.resolve_bits(a));
    }
}
