//! Error types for storage operations

use core::fmt;

/// Result type for storage operations
pub type Result<T> = core::result::Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Request extends past the capacity of the medium
    OutOfBounds,

    /// Erase length is not a multiple of the sector size
    BadEraseLength,

    /// The medium rejected a program operation
    ProgramFailed,

    /// The medium rejected a sector erase
    EraseFailed,

    /// The medium failed to power up at the start of a save
    PowerUpFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "Request extends past storage capacity"),
            Self::BadEraseLength => write!(f, "Erase length is not a sector multiple"),
            Self::ProgramFailed => write!(f, "Medium program operation failed"),
            Self::EraseFailed => write!(f, "Medium sector erase failed"),
            Self::PowerUpFailed => write!(f, "Medium power-up failed"),
        }
    }
}
