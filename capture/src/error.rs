//! Error types for the capture layer

use core::fmt;

use faultline_storage::StorageError;
use faultline_wire::EncodeError;

/// Result type for capture operations
pub type Result<T> = core::result::Result<T, CaptureError>;

/// Errors that can occur while capturing events or snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// Event serialization ran out of arena space
    Encode(EncodeError),

    /// The storage driver rejected an operation
    Storage(StorageError),

    /// The snapshot does not fit the storage region
    SnapshotTooLarge { required: u32, available: u32 },
}

impl From<EncodeError> for CaptureError {
    fn from(e: EncodeError) -> Self {
        CaptureError::Encode(e)
    }
}

impl From<StorageError> for CaptureError {
    fn from(e: StorageError) -> Self {
        CaptureError::Storage(e)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "Event encoding failed: {}", e),
            Self::Storage(e) => write!(f, "Snapshot storage failed: {}", e),
            Self::SnapshotTooLarge {
                required,
                available,
            } => write!(
                f,
                "Snapshot needs {} bytes but storage holds {}",
                required, available
            ),
        }
    }
}
