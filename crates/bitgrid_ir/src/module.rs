//! A finished module and its textual dump.

use crate::arena::Arena;
use crate::bits::{resolve_signal, BitSource};
use crate::cell::{Cell, CellKind};
use crate::ids::{CellId, SignalId};
use crate::port::{Port, PortDirection};
use crate::signal::Signal;
use crate::types::TypeDb;
use bitgrid_common::{Ident, Interner};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A module produced by [`ModuleBuilder::finish`](crate::ModuleBuilder::finish).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: Ident,
    /// The external interface, in declaration order.
    pub ports: Vec<Port>,
    /// All signals: input ports first as declared, then cell outputs.
    pub signals: Arena<SignalId, Signal>,
    /// All cells in construction order.
    pub cells: Arena<CellId, Cell>,
    /// Types of the signals above.
    pub types: TypeDb,
}

impl Module {
    /// Finds a port by name.
    pub fn port(&self, interner: &Interner, name: &str) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| interner.resolve(p.name) == name)
    }

    /// Maps each cell output back to its cell.
    pub fn driver_map(&self) -> HashMap<SignalId, CellId> {
        self.cells
            .values()
            .filter_map(|cell| cell.output().map(|sig| (sig, cell.id)))
            .collect()
    }

    /// Bit provenance of a signal, LSB first.
    pub fn resolve_bits(&self, signal: SignalId) -> Vec<BitSource> {
        let drivers = self.driver_map();
        let mut memo = HashMap::new();
        resolve_signal(
            signal,
            &self.signals,
            &self.cells,
            &self.types,
            &drivers,
            &mut memo,
        )
    }

    /// Number of cells of each mnemonic, for quick structural checks.
    pub fn cell_histogram(&self) -> HashMap<&'static str, usize> {
        let mut hist = HashMap::new();
        for cell in self.cells.values() {
            *hist.entry(cell.kind.mnemonic()).or_insert(0) += 1;
        }
        hist
    }

    /// Returns a [`Display`](fmt::Display) adapter printing the module as text.
    pub fn display<'a>(&'a self, interner: &'a Interner) -> ModuleDisplay<'a> {
        ModuleDisplay {
            module: self,
            interner,
        }
    }
}

/// Textual IR dump of a [`Module`].
pub struct ModuleDisplay<'a> {
    module: &'a Module,
    interner: &'a Interner,
}

impl fmt::Display for ModuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.module;
        let name = |id: Ident| self.interner.resolve(id);
        writeln!(f, "module {} {{", name(m.name))?;
        for port in m.ports.iter().filter(|p| p.direction == PortDirection::Input) {
            if let Some(sig) = port.signal {
                writeln!(
                    f,
                    "  input {sig} {} : {}",
                    name(port.name),
                    m.types.display(port.ty)
                )?;
            }
        }
        for cell in m.cells.values() {
            let Some(out) = cell.output() else { continue };
            let sig = &m.signals[out];
            let operands: Vec<String> = cell.inputs().map(|s| s.to_string()).collect();
            let attrs = match &cell.kind {
                CellKind::Const { value } => format!(" {}'b{value}", value.width()),
                CellKind::Slice { offset, width } => format!("[{offset} +: {width}]"),
                _ => String::new(),
            };
            let mut rhs = format!("{}{attrs}", cell.kind.mnemonic());
            if !operands.is_empty() {
                rhs.push(' ');
                rhs.push_str(&operands.join(", "));
            }
            writeln!(
                f,
                "  {out} {} = {rhs} : {}",
                name(sig.name),
                m.types.display(sig.ty)
            )?;
        }
        for port in m.ports.iter().filter(|p| p.direction == PortDirection::Output) {
            let driver = port
                .signal
                .map(|s| s.to_string())
                .unwrap_or_else(|| "<undriven>".to_string());
            writeln!(
                f,
                "  output {} : {} = {driver}",
                name(port.name),
                m.types.display(port.ty)
            )?;
        }
        write!(f, "}}")
    }
}
