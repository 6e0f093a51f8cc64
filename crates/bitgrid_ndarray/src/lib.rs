//! Symbolic N-dimensional arrays of hardware bit vectors.
//!
//! An [`NdArray`] is a grid of fixed-width elements whose contents are
//! deferred bit-range views ([`BitView`]) of signals in a
//! [`ModuleBuilder`](bitgrid_ir::ModuleBuilder). Arrays are populated by
//! element or region writes, rearranged with numpy-style transformations
//! (transpose, reshape, roll, concatenate) that never copy, and finally
//! lowered into one flat signal.
//!
//! ```ignore
//! let mut m = NdArray::new(&[32], Dtype::I32)?.named("m2");
//! for i in 0..16 {
//!     m.set(&[i], in1)?;
//! }
//! m.assign(&sel![16..32], in0)?;
//! let out = m.reshape(&[4, 8])?.lower(&mut ir, true)?;
//! ```

#![warn(missing_docs)]

pub mod array;
pub mod array_like;
pub mod dtype;
pub mod error;
pub mod index;
pub mod lower;
pub mod store;
pub mod view;

pub use array::{ArrayState, NdArray};
pub use array_like::{ArrayLike, ArrayValueExt};
pub use dtype::Dtype;
pub use error::{NdError, NdResult};
pub use index::{IndexMap, Sel, SliceSpec};
pub use store::{Coercion, Element, ElementStore};
pub use view::BitView;
