//! The signal substrate bitgrid arrays are built on.
//!
//! This crate defines a deliberately small hardware IR: a [`Module`] of
//! [`Signal`]s driven by [`Cell`]s (constants, bit slices, concatenations,
//! pass-through buffers, and bitcasts) and exposed through [`Port`]s. All
//! construction goes through a [`ModuleBuilder`], the explicit context handle
//! that array code threads through every call.

#![warn(missing_docs)]

pub mod arena;
pub mod bits;
pub mod builder;
pub mod cell;
pub mod error;
pub mod ids;
pub mod module;
pub mod port;
pub mod signal;
pub mod types;

pub use arena::{Arena, ArenaId};
pub use bits::BitSource;
pub use builder::ModuleBuilder;
pub use cell::{Cell, CellKind, Connection};
pub use error::{IrError, IrResult};
pub use ids::{CellId, PortId, SignalId, TypeId};
pub use module::Module;
pub use port::{Port, PortDirection};
pub use signal::{Signal, SignalKind, Value};
pub use types::{Type, TypeDb};
