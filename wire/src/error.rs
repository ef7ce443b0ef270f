//! Error types for wire encoding

use core::fmt;

/// Result type for encoder operations
pub type Result<T> = core::result::Result<T, EncodeError>;

/// Errors that can occur while encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Encoding the item would push the session past its capacity ceiling
    OutOfSpace,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfSpace => write!(f, "Encoded data would exceed session capacity"),
        }
    }
}
