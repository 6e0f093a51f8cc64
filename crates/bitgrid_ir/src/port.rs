//! Module ports.

use crate::ids::{PortId, SignalId, TypeId};
use bitgrid_common::Ident;
use serde::{Deserialize, Serialize};

/// Which way data crosses the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven from outside.
    Input,
    /// Driven by the module.
    Output,
}

/// One entry of a module's interface.
///
/// `signal` is set for inputs as soon as they are declared. Outputs have
/// none until [`ModuleBuilder::drive_output`](crate::ModuleBuilder::drive_output)
/// connects one of matching width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Position in the interface.
    pub id: PortId,
    /// Port name.
    pub name: Ident,
    /// Input or output.
    pub direction: PortDirection,
    /// Declared type; its bit width is what `drive_output` checks.
    pub ty: TypeId,
    /// Signal behind the port, if any.
    pub signal: Option<SignalId>,
}

impl Port {
    /// `true` for an output nothing drives yet.
    pub fn is_undriven(&self) -> bool {
        self.direction == PortDirection::Output && self.signal.is_none()
    }
}
