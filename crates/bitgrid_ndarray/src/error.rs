//! Error types for array construction, indexing, and lowering.

use bitgrid_ir::IrError;

/// The result type for array operations.
pub type NdResult<T> = Result<T, NdError>;

/// Everything that can go wrong with an array.
///
/// All errors are raised at the call that violates the contract; nothing is
/// truncated, extended, or defaulted silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdError {
    /// A coordinate or selection is out of bounds or has the wrong arity.
    #[error("index error: {0}")]
    Index(String),

    /// Incompatible shapes or an invalid permutation.
    #[error("shape error: {0}")]
    Shape(String),

    /// A value's width does not fit the destination and no coercion applies.
    #[error("width error: {0}")]
    Width(String),

    /// Arrays with different element widths were combined.
    #[error("dtype mismatch: expected i{expected}, found i{found}")]
    DtypeMismatch {
        /// Element width of the first operand.
        expected: u32,
        /// Element width of the offending operand.
        found: u32,
    },

    /// An element was needed but never written.
    #[error("element at offset {offset} is unset")]
    UnsetElement {
        /// Row-major linear offset of the first missing element.
        offset: usize,
    },

    /// The IR rejected a structural operation.
    #[error(transparent)]
    Ir(#[from] IrError),
}
