//! Batch orchestrator: fans the file selection out to every enabled
//! destination, one destination at a time.
//!
//! Destinations run strictly sequentially, and files within a
//! destination run sequentially too. There is exactly one writer to any
//! ledger entry at a time — enforced by the scheduling, not a lock — so
//! a slow or failing destination can never interleave partial state
//! with another's. The suspension points are exactly the authorizer and
//! transport calls; ledger arithmetic is synchronous.

use blobcast_core::{Destination, LocalFile, StoredBlobDescriptor, UPLOAD_ACTION};
use blobcast_ledger::TransferLedger;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::collaborators::{Authorizer, BlobCacheNotifier, Sanitizer, Transport};
use crate::destinations::DestinationSet;
use crate::error::UploadError;
use crate::selection::Selection;
use crate::types::{BatchEvent, BatchOptions, DestinationResult};

/// Orchestrates one batch at a time over a fixed set of collaborators.
pub struct BatchOrchestrator<'a> {
    sanitizer: &'a dyn Sanitizer,
    authorizer: &'a dyn Authorizer,
    transport: &'a dyn Transport,
    notifier: &'a dyn BlobCacheNotifier,
    events_tx: mpsc::Sender<BatchEvent>,
    events_rx: Option<mpsc::Receiver<BatchEvent>>,
}

impl<'a> BatchOrchestrator<'a> {
    /// Creates a new orchestrator.
    pub fn new(
        sanitizer: &'a dyn Sanitizer,
        authorizer: &'a dyn Authorizer,
        transport: &'a dyn Transport,
        notifier: &'a dyn BlobCacheNotifier,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            sanitizer,
            authorizer,
            transport,
            notifier,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<BatchEvent>> {
        self.events_rx.take()
    }

    /// Best-effort event emission. The ledger is the source of truth;
    /// a full or unconsumed channel drops the event rather than ever
    /// blocking the batch.
    fn emit(&self, event: BatchEvent) {
        let _ = self.events_tx.try_send(event);
    }

    /// Runs one batch: the current selection against every enabled
    /// destination.
    ///
    /// An empty selection is a no-op: no ledger mutation, no network
    /// calls. Otherwise the selection is consumed — cleared once every
    /// enabled destination has finished its pass — regardless of
    /// per-destination failures. Returns one result per attempted
    /// destination pass.
    pub async fn run(
        &self,
        selection: &mut Selection,
        set: &DestinationSet,
        options: &BatchOptions,
    ) -> Vec<DestinationResult> {
        if selection.is_empty() {
            return Vec::new();
        }

        let files = self
            .sanitize_pass(selection.files(), options.strip_metadata)
            .await;
        let total: u64 = files.iter().map(LocalFile::size).sum();

        let ledger = set.ledger();
        ledger.begin_batch(total);
        info!(files = files.len(), total_bytes = total, "batch sized");

        let mut results = Vec::new();
        for dest in set.destinations() {
            // Enabled is read once per destination, at loop start.
            if !ledger.is_enabled(&dest.name) {
                debug!(destination = %dest.name, "destination disabled, skipping");
                continue;
            }

            let result = self.run_destination(dest, &files, &ledger).await;
            match &result.error {
                None => {
                    self.emit(BatchEvent::DestinationCompleted {
                        destination: dest.name.clone(),
                    });
                    info!(destination = %dest.name, stored = result.stored.len(), "destination pass complete");
                }
                Some(err) => {
                    self.emit(BatchEvent::DestinationFailed {
                        destination: dest.name.clone(),
                        error: err.clone(),
                    });
                    error!(destination = %dest.name, error = %err, "destination pass aborted");
                }
            }

            self.notifier.destination_refreshed(&dest.name);
            results.push(result);
        }

        // The batch is consumed whatever the per-destination outcomes.
        selection.clear();
        results
    }

    /// Runs the sanitizer over the selection, in order.
    ///
    /// A file whose sanitization fails is dropped from the batch; the
    /// remaining files proceed. Sizing happens on the surviving set.
    async fn sanitize_pass(&self, files: &[LocalFile], strip: bool) -> Vec<LocalFile> {
        if !strip {
            return files.to_vec();
        }

        let mut out = Vec::with_capacity(files.len());
        for file in files {
            match self.sanitizer.sanitize(file).await {
                Ok(clean) => out.push(clean),
                Err(e) => {
                    warn!(file = %file.name, error = %e, "sanitization failed, dropping file from batch");
                }
            }
        }
        out
    }

    /// One destination's pass over every file, in selection order.
    ///
    /// The first failure aborts this destination's remaining files;
    /// other destinations are unaffected.
    async fn run_destination(
        &self,
        dest: &Destination,
        files: &[LocalFile],
        ledger: &TransferLedger,
    ) -> DestinationResult {
        if dest.base_url.is_empty() {
            return DestinationResult {
                destination: dest.name.clone(),
                success: false,
                error: Some(
                    UploadError::Config(format!("destination {} has no base URL", dest.name))
                        .to_string(),
                ),
                stored: Vec::new(),
            };
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            match self.send_file(dest, file, ledger).await {
                Ok(descriptor) => {
                    if let Some(state) = ledger.get(&dest.name) {
                        self.emit(BatchEvent::Progress {
                            destination: dest.name.clone(),
                            transferred: state.transferred,
                            size: state.size,
                        });
                    }
                    stored.push(descriptor);
                }
                Err(e) => {
                    return DestinationResult {
                        destination: dest.name.clone(),
                        success: false,
                        error: Some(e.to_string()),
                        stored,
                    };
                }
            }
        }

        DestinationResult {
            destination: dest.name.clone(),
            success: true,
            error: None,
            stored,
        }
    }

    /// Authorizes and transfers a single file, then records progress.
    async fn send_file(
        &self,
        dest: &Destination,
        file: &LocalFile,
        ledger: &TransferLedger,
    ) -> Result<StoredBlobDescriptor, UploadError> {
        // Fresh credential per (file, destination) pair.
        let auth = self.authorizer.sign_upload(file, UPLOAD_ACTION).await?;
        let descriptor = self
            .transport
            .upload_blob(&dest.base_url, file, &auth)
            .await?;
        ledger.record_transferred(&dest.name, file.size());
        debug!(destination = %dest.name, file = %file.name, bytes = file.size(), "file transferred");
        Ok(descriptor)
    }
}
