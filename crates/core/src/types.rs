use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An in-memory file payload selected for upload.
///
/// Immutable once selected: sanitization produces a replacement value
/// via [`with_data`](Self::with_data) rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// File name as picked by the user.
    pub name: String,
    /// Declared media type, e.g. `image/jpeg`.
    pub content_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl LocalFile {
    /// Creates a new file payload.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Returns the payload size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns a copy of this file with `data` replaced wholesale.
    pub fn with_data(&self, data: Vec<u8>) -> Self {
        Self {
            name: self.name.clone(),
            content_type: self.content_type.clone(),
            data,
        }
    }
}

/// A configured remote blob-storage endpoint.
///
/// Supplied externally; upload logic only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Unique name, acts as the ledger key.
    pub name: String,
    /// Base address blobs are uploaded to.
    pub base_url: String,
}

/// Opaque signed credential for one (file, destination) upload.
///
/// Single-use: never reused across files or across destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAuthorization(String);

impl UploadAuthorization {
    /// Wraps a signed token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string.
    pub fn token(&self) -> &str {
        &self.0
    }
}

/// Descriptor of a blob stored at a destination.
///
/// Ownership passes to the batch caller; nothing in blobcast retains it
/// beyond reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlobDescriptor {
    pub digest: String,
    pub size: u64,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}
