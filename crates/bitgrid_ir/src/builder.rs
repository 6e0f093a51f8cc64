//! The module builder: the context handle every array operation threads.
//!
//! A [`ModuleBuilder`] owns the signals, cells, and ports of one module while
//! it is under construction and offers the capabilities the array layer
//! consumes: ports, constants, bit slices, concatenation, named pass-through
//! wires, and bitcasts. Nothing is global; callers pass `&mut ModuleBuilder`
//! explicitly.

use crate::arena::Arena;
use crate::bits::{resolve_signal, BitSource};
use crate::cell::{Cell, CellKind, Connection};
use crate::error::{IrError, IrResult};
use crate::ids::{CellId, PortId, SignalId, TypeId};
use crate::module::Module;
use crate::port::{Port, PortDirection};
use crate::signal::{Signal, SignalKind, Value};
use crate::types::TypeDb;
use bitgrid_common::{Ident, Interner, LogicVec};
use std::collections::{HashMap, HashSet};

/// Mutable construction state for a single module.
pub struct ModuleBuilder<'a> {
    name: Ident,
    /// Type database for this module's signals.
    pub types: TypeDb,
    /// String interner (borrowed from caller).
    pub interner: &'a Interner,
    signals: Arena<SignalId, Signal>,
    cells: Arena<CellId, Cell>,
    ports: Vec<Port>,
    drivers: HashMap<SignalId, CellId>,
    /// Names held by a port or signal of this module.
    taken: HashSet<Ident>,
}

impl<'a> ModuleBuilder<'a> {
    /// Starts an empty module.
    pub fn new(name: &str, interner: &'a Interner) -> Self {
        Self {
            name: interner.get_or_intern(name),
            types: TypeDb::new(),
            interner,
            signals: Arena::new(),
            cells: Arena::new(),
            ports: Vec::new(),
            drivers: HashMap::new(),
            taken: HashSet::new(),
        }
    }

    /// Declares an input port and returns the value it carries.
    pub fn input(&mut self, name: &str, ty: TypeId) -> Value {
        let ident = self.interner.get_or_intern(name);
        self.taken.insert(ident);
        let signal = self.signals.alloc_with(|id| Signal {
            id,
            name: ident,
            ty,
            kind: SignalKind::Port,
        });
        self.ports.push(Port {
            id: PortId::from_raw(self.ports.len() as u32),
            name: ident,
            direction: PortDirection::Input,
            ty,
            signal: Some(signal),
        });
        self.value_of(signal)
    }

    /// Declares an output port; drive it later with [`drive_output`](Self::drive_output).
    pub fn output(&mut self, name: &str, ty: TypeId) -> PortId {
        let id = PortId::from_raw(self.ports.len() as u32);
        let ident = self.interner.get_or_intern(name);
        self.taken.insert(ident);
        self.ports.push(Port {
            id,
            name: ident,
            direction: PortDirection::Output,
            ty,
            signal: None,
        });
        id
    }

    /// Connects `value` to an output port. Only the widths have to agree.
    pub fn drive_output(&mut self, port: PortId, value: Value) -> IrResult<()> {
        let expected = match self.ports.get(port.as_raw() as usize) {
            Some(p) if p.direction == PortDirection::Output => self.types.bit_width(p.ty),
            Some(p) => {
                return Err(IrError::NotAnOutput(
                    self.interner.resolve(p.name).to_string(),
                ))
            }
            None => return Err(IrError::NotAnOutput(port.to_string())),
        };
        let p = &mut self.ports[port.as_raw() as usize];
        let name = self.interner.resolve(p.name).to_string();
        if p.signal.is_some() {
            return Err(IrError::AlreadyDriven(name));
        }
        if value.width != expected {
            return Err(IrError::OutputWidth {
                port: name,
                expected,
                found: value.width,
            });
        }
        p.signal = Some(value.signal);
        Ok(())
    }

    /// Materializes a constant.
    pub fn constant(&mut self, value: LogicVec) -> IrResult<Value> {
        if value.width() == 0 {
            return Err(IrError::ZeroWidth("constant"));
        }
        let ty = self.types.bits(value.width());
        Ok(self.add_cell(CellKind::Const { value }, &[], ty, None))
    }

    /// Extracts bits `[low, low + width)` of `value` into a new signal.
    pub fn slice(&mut self, value: Value, low: u32, width: u32) -> IrResult<Value> {
        if width == 0 {
            return Err(IrError::ZeroWidth("slice"));
        }
        if low.checked_add(width).map_or(true, |end| end > value.width) {
            return Err(IrError::SliceOutOfRange {
                low,
                width,
                source_width: value.width,
            });
        }
        let ty = self.types.bits(width);
        Ok(self.add_cell(
            CellKind::Slice { offset: low, width },
            &[value.signal],
            ty,
            None,
        ))
    }

    /// Concatenates values; `parts[0]` becomes the most significant bits.
    pub fn concat(&mut self, parts: &[Value]) -> IrResult<Value> {
        let width: u32 = parts.iter().map(|p| p.width).sum();
        if width == 0 {
            return Err(IrError::ZeroWidth("concatenation"));
        }
        let ty = self.types.bits(width);
        let inputs: Vec<SignalId> = parts.iter().map(|p| p.signal).collect();
        Ok(self.add_cell(CellKind::Concat, &inputs, ty, None))
    }

    /// Wraps `value` in a named pass-through wire.
    ///
    /// Functionally transparent; it exists so the value shows up under a
    /// recognizable name in the dumped IR.
    pub fn wire(&mut self, name: Ident, value: Value) -> Value {
        self.add_cell(CellKind::Buf, &[value.signal], value.ty, Some(name))
    }

    /// `name` itself if no port or signal of this module uses it yet,
    /// otherwise a fresh `<name>_<n>`.
    pub fn unique_name(&self, name: &str) -> Ident {
        let ident = self.interner.get_or_intern(name);
        if self.taken.contains(&ident) {
            self.interner.fresh(name)
        } else {
            ident
        }
    }

    /// Reinterprets `value` as `ty`, which must have the same bit width.
    pub fn bitcast(&mut self, value: Value, ty: TypeId) -> IrResult<Value> {
        let to = self.types.bit_width(ty);
        if to != value.width {
            return Err(IrError::BitcastWidth {
                from: value.width,
                to,
            });
        }
        Ok(self.add_cell(CellKind::Bitcast, &[value.signal], ty, None))
    }

    /// Returns the value handle for an existing signal.
    ///
    /// # Panics
    ///
    /// Panics if the signal was not allocated by this builder.
    pub fn value_of(&self, signal: SignalId) -> Value {
        let ty = self.signals[signal].ty;
        Value {
            signal,
            ty,
            width: self.types.bit_width(ty),
        }
    }

    /// Returns the signal with the given ID.
    pub fn signal(&self, id: SignalId) -> Option<&Signal> {
        self.signals.get(id)
    }

    /// Returns the cell driving `signal`, if any.
    pub fn driver(&self, signal: SignalId) -> Option<&Cell> {
        self.drivers.get(&signal).map(|c| &self.cells[*c])
    }

    /// Number of cells built so far.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Traces every bit of `value` back to input-port bits or constant bits,
    /// LSB first.
    pub fn resolve_bits(&self, value: Value) -> Vec<BitSource> {
        let mut memo = HashMap::new();
        resolve_signal(
            value.signal,
            &self.signals,
            &self.cells,
            &self.types,
            &self.drivers,
            &mut memo,
        )
    }

    /// Finishes construction.
    pub fn finish(self) -> Module {
        for port in self.ports.iter().filter(|p| p.is_undriven()) {
            log::warn!(
                "output '{}' of '{}' is left undriven",
                self.interner.resolve(port.name),
                self.interner.resolve(self.name)
            );
        }
        log::debug!(
            "finished module '{}': {} signals, {} cells, {} ports",
            self.interner.resolve(self.name),
            self.signals.len(),
            self.cells.len(),
            self.ports.len()
        );
        Module {
            name: self.name,
            ports: self.ports,
            signals: self.signals,
            cells: self.cells,
            types: self.types,
        }
    }

    /// Adds a cell driving a fresh signal of type `ty`.
    ///
    /// The output signal takes `name` if given, otherwise the cell's
    /// generated name.
    fn add_cell(
        &mut self,
        kind: CellKind,
        inputs: &[SignalId],
        ty: TypeId,
        name: Option<Ident>,
    ) -> Value {
        let cell_name = self.interner.fresh(&format!("_{}", kind.mnemonic()));
        let out_name = name.unwrap_or(cell_name);
        self.taken.insert(out_name);
        let out = self.signals.alloc_with(|id| Signal {
            id,
            name: out_name,
            ty,
            kind: SignalKind::Wire,
        });
        let mut connections: Vec<Connection> = inputs
            .iter()
            .enumerate()
            .map(|(i, sig)| Connection {
                port_name: self.interner.get_or_intern(&format!("I{i}")),
                direction: PortDirection::Input,
                signal: *sig,
            })
            .collect();
        connections.push(Connection {
            port_name: self.interner.get_or_intern("Y"),
            direction: PortDirection::Output,
            signal: out,
        });
        log::trace!(
            "{}: {} over {} input(s)",
            self.interner.resolve(cell_name),
            kind.mnemonic(),
            inputs.len()
        );
        let cell = self.cells.alloc_with(|id| Cell {
            id,
            name: cell_name,
            kind,
            connections,
        });
        self.drivers.insert(out, cell);
        self.value_of(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitgrid_common::Logic;

    #[test]
    fn input_creates_port_and_signal() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let i32_ty = b.types.bits(32);
        let arr = b.types.array(i32_ty, &[16]);
        let v = b.input("in0", arr);
        assert_eq!(v.width, 512);
        assert_eq!(b.signal(v.signal).unwrap().kind, SignalKind::Port);
        assert!(b.driver(v.signal).is_none());
    }

    #[test]
    fn slice_checks_range() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(8);
        let v = b.input("a", ty);
        let s = b.slice(v, 4, 4).unwrap();
        assert_eq!(s.width, 4);
        assert_eq!(
            b.slice(v, 6, 4),
            Err(IrError::SliceOutOfRange {
                low: 6,
                width: 4,
                source_width: 8
            })
        );
        assert_eq!(b.slice(v, 0, 0), Err(IrError::ZeroWidth("slice")));
        assert_eq!(
            b.slice(v, u32::MAX, 2),
            Err(IrError::SliceOutOfRange {
                low: u32::MAX,
                width: 2,
                source_width: 8
            })
        );
    }

    #[test]
    fn concat_sums_widths() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(3);
        let x = b.input("x", ty);
        let y = b.input("y", ty);
        let c = b.concat(&[x, y]).unwrap();
        assert_eq!(c.width, 6);
        assert_eq!(b.driver(c.signal).unwrap().kind, CellKind::Concat);
        assert!(b.concat(&[]).is_err());
    }

    #[test]
    fn wire_keeps_type_and_takes_name() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let i32_ty = b.types.bits(32);
        let arr = b.types.array(i32_ty, &[10]);
        let v = b.input("in1", arr);
        let name = interner.get_or_intern("m1");
        let w = b.wire(name, v);
        assert_eq!(w.ty, arr);
        assert_eq!(b.signal(w.signal).unwrap().name, name);
        assert_eq!(b.resolve_bits(w), b.resolve_bits(v));
    }

    #[test]
    fn bitcast_requires_equal_width() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let i1024 = b.types.bits(1024);
        let i32_ty = b.types.bits(32);
        let arr = b.types.array(i32_ty, &[32]);
        let v = b.input("flat", i1024);
        let cast = b.bitcast(v, arr).unwrap();
        assert_eq!(cast.ty, arr);
        let small = b.types.bits(16);
        assert_eq!(
            b.bitcast(v, small),
            Err(IrError::BitcastWidth { from: 1024, to: 16 })
        );
    }

    #[test]
    fn drive_output_checks_width_and_double_drive() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(8);
        let narrow = b.types.bits(4);
        let out = b.output("out", ty);
        let v = b.input("a", ty);
        let n = b.input("n", narrow);
        assert!(matches!(
            b.drive_output(out, n),
            Err(IrError::OutputWidth { expected: 8, found: 4, .. })
        ));
        b.drive_output(out, v).unwrap();
        assert_eq!(
            b.drive_output(out, v),
            Err(IrError::AlreadyDriven("out".to_string()))
        );
        assert!(matches!(
            b.drive_output(PortId::from_raw(1), v),
            Err(IrError::NotAnOutput(_))
        ));
    }

    #[test]
    fn constant_bits_resolve() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let c = b.constant(LogicVec::from_u64(0b10, 2)).unwrap();
        assert_eq!(
            b.resolve_bits(c),
            vec![BitSource::Const(Logic::Zero), BitSource::Const(Logic::One)]
        );
        assert!(b.constant(LogicVec::new(0)).is_err());
    }

    #[test]
    fn generated_cell_names_are_unique() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(8);
        let v = b.input("a", ty);
        let s0 = b.slice(v, 0, 1).unwrap();
        let s1 = b.slice(v, 1, 1).unwrap();
        let n0 = b.signal(s0.signal).unwrap().name;
        let n1 = b.signal(s1.signal).unwrap().name;
        assert_ne!(n0, n1);
        assert_eq!(interner.resolve(n0), "_slice_0");
        assert_eq!(b.cell_count(), 2);
    }

    #[test]
    fn unique_name_avoids_ports_and_signals() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new("m", &interner);
        let ty = b.types.bits(8);
        let v = b.input("in1", ty);
        b.output("out", ty);
        assert_eq!(interner.resolve(b.unique_name("grid")), "grid");
        assert_eq!(interner.resolve(b.unique_name("in1")), "in1_0");
        assert_eq!(interner.resolve(b.unique_name("out")), "out_0");

        let name = b.unique_name("grid");
        b.wire(name, v);
        assert_eq!(interner.resolve(b.unique_name("grid")), "grid_0");
    }
}
