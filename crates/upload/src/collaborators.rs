//! Collaborator traits for the batch orchestrator.
//!
//! Implementations live outside this crate — blobcast-remote for the
//! wire, blobcast-sanitize for metadata stripping. Using traits keeps
//! the batch logic transport-free and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use blobcast_core::{LocalFile, StoredBlobDescriptor, UploadAuthorization};

use crate::error::UploadError;

/// Issues signed upload credentials.
pub trait Authorizer: Send + Sync {
    /// Signs an authorization for one file and one declared action.
    ///
    /// The artifact is single-use, bound to the file's digest; the
    /// orchestrator requests a fresh one per (file, destination) pair
    /// and never caches it.
    fn sign_upload<'a>(
        &'a self,
        file: &'a LocalFile,
        action: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadAuthorization, UploadError>> + Send + 'a>>;
}

/// Performs the actual blob transfer to one destination.
pub trait Transport: Send + Sync {
    /// Uploads `file` to the destination at `base_url`.
    fn upload_blob<'a>(
        &'a self,
        base_url: &'a str,
        file: &'a LocalFile,
        auth: &'a UploadAuthorization,
    ) -> Pin<Box<dyn Future<Output = Result<StoredBlobDescriptor, UploadError>> + Send + 'a>>;
}

/// Removes embedded private metadata from a file.
pub trait Sanitizer: Send + Sync {
    /// Returns a sanitized replacement for `file`.
    fn sanitize<'a>(
        &'a self,
        file: &'a LocalFile,
    ) -> Pin<Box<dyn Future<Output = Result<LocalFile, UploadError>> + Send + 'a>>;
}

/// Receives the fire-and-forget "destination pass complete" signal.
///
/// Stale blob listings for a destination are refreshed off the back of
/// this call.
pub trait BlobCacheNotifier: Send + Sync {
    /// Called exactly once per destination per attempted batch pass,
    /// whether the pass completed or aborted.
    fn destination_refreshed(&self, destination: &str);
}
