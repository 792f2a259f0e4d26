//! Batch upload flow: sanitize, size, fan out, account.
//!
//! This crate implements the **business logic** for pushing a file
//! selection to every enabled destination. It is a library crate with
//! no transport dependencies — callers provide [`Authorizer`],
//! [`Transport`], [`Sanitizer`] and [`BlobCacheNotifier`]
//! implementations (blobcast-remote and blobcast-sanitize ship the
//! production ones).
//!
//! # Pipeline
//!
//! 1. **Sanitize** — strip private metadata, once per batch
//! 2. **Size** — set every enabled ledger entry in one update
//! 3. **Fan out** — per destination, per file: authorize then transfer
//! 4. **Refresh** — signal each destination's blob cache after its pass
//! 5. **Clear** — consume the selection, whatever the outcomes

pub mod batch;
pub mod collaborators;
pub mod destinations;
pub mod error;
pub mod selection;
pub mod types;

// Re-export primary types for convenience.
pub use batch::BatchOrchestrator;
pub use collaborators::{Authorizer, BlobCacheNotifier, Sanitizer, Transport};
pub use destinations::DestinationSet;
pub use error::UploadError;
pub use selection::Selection;
pub use types::{BatchEvent, BatchOptions, DestinationResult};
