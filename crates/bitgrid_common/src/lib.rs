//! Names and constant bit values shared by the IR and the array layer.

#![warn(missing_docs)]

pub mod ident;
pub mod logic;
pub mod logic_vec;

pub use ident::{Ident, Interner};
pub use logic::Logic;
pub use logic_vec::LogicVec;
