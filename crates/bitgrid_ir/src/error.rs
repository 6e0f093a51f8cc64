//! Errors raised by [`ModuleBuilder`](crate::ModuleBuilder) operations.

/// The result type for builder operations.
pub type IrResult<T> = Result<T, IrError>;

/// A structural operation was given operands it cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// A slice reaches past the end of its source.
    #[error("slice [{low}, {}) out of range for a {source_width}-bit value", low + width)]
    SliceOutOfRange {
        /// First bit of the slice.
        low: u32,
        /// Width of the slice.
        width: u32,
        /// Width of the sliced value.
        source_width: u32,
    },

    /// A zero-width slice, constant, or concatenation was requested.
    #[error("zero-width {0} is not representable")]
    ZeroWidth(&'static str),

    /// A bitcast between types of different widths.
    #[error("cannot bitcast a {from}-bit value to {to} bits")]
    BitcastWidth {
        /// Width of the source value.
        from: u32,
        /// Width of the target type.
        to: u32,
    },

    /// An output port was driven with a value of the wrong width.
    #[error("output '{port}' expects {expected} bits, got {found}")]
    OutputWidth {
        /// The port name.
        port: String,
        /// Declared width.
        expected: u32,
        /// Width of the value.
        found: u32,
    },

    /// An output port was driven twice.
    #[error("output '{0}' is already driven")]
    AlreadyDriven(String),

    /// A port ID does not name an output of this module.
    #[error("'{0}' is not an output port")]
    NotAnOutput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_slice_out_of_range() {
        let err = IrError::SliceOutOfRange {
            low: 28,
            width: 8,
            source_width: 32,
        };
        assert_eq!(
            err.to_string(),
            "slice [28, 36) out of range for a 32-bit value"
        );
    }

    #[test]
    fn display_output_width() {
        let err = IrError::OutputWidth {
            port: "out".to_string(),
            expected: 1024,
            found: 512,
        };
        assert_eq!(err.to_string(), "output 'out' expects 1024 bits, got 512");
    }
}
