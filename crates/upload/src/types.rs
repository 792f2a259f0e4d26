//! Data types for the batch upload flow.

use blobcast_core::StoredBlobDescriptor;

/// Options for one batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Strip embedded private metadata (EXIF) before transfer.
    pub strip_metadata: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        // Stripping is on unless the user opts out.
        Self {
            strip_metadata: true,
        }
    }
}

/// Progress event emitted during a batch.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Ledger state after a successful file transfer.
    Progress {
        destination: String,
        transferred: u64,
        size: u64,
    },
    /// A destination finished its pass over every file.
    DestinationCompleted { destination: String },
    /// A destination's pass aborted.
    DestinationFailed { destination: String, error: String },
}

/// Result of one destination's pass over the batch.
#[derive(Debug, Clone)]
pub struct DestinationResult {
    pub destination: String,
    pub success: bool,
    pub error: Option<String>,
    /// Descriptors for the blobs stored before any abort.
    pub stored: Vec<StoredBlobDescriptor>,
}
