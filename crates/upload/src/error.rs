//! Upload error types.

/// Errors produced during a batch upload.
///
/// Every variant is destination-local: a failure aborts at most one
/// destination's remaining file loop and never the batch itself.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("sanitization failed: {0}")]
    Sanitize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
