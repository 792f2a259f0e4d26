//! Shared data model for the blobcast crates.
//!
//! This crate holds the types every other crate agrees on: the in-memory
//! file payload, the destination descriptor, the opaque upload
//! authorization, and the descriptor returned by a completed transfer.

mod types;

pub use types::{Destination, LocalFile, StoredBlobDescriptor, UploadAuthorization};

/// Action label declared when requesting an upload authorization.
pub const UPLOAD_ACTION: &str = "Upload Blob";
