//! Signals and the value handles passed between builder calls.

use crate::ids::{SignalId, TypeId};
use bitgrid_common::Ident;
use serde::{Deserialize, Serialize};

/// How a signal is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Backs an input port; has no driving cell.
    Port,
    /// Driven by exactly one cell.
    Wire,
}

/// A named signal within a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The unique ID of this signal within its module.
    pub id: SignalId,
    /// The signal name.
    pub name: Ident,
    /// The type of this signal.
    pub ty: TypeId,
    /// Whether this signal is a port or a cell output.
    pub kind: SignalKind,
}

/// A typed handle to a signal, as returned by every builder operation.
///
/// This is the "signal" of the array layer: it knows its width, and the
/// builder can slice it, concatenate it, or wrap it in a named wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    /// The signal carrying the value.
    pub signal: SignalId,
    /// The signal's type.
    pub ty: TypeId,
    /// Total bit width of `ty`.
    pub width: u32,
}
