//! Per-destination transfer accounting.
//!
//! The ledger is the one piece of state shared between the batch loop
//! and its observers (the progress display). Every operation takes the
//! write lock once and applies a whole update, so readers only ever see
//! complete states: a destination's `size` is always set before its
//! first `transferred` increment.

use std::collections::HashMap;
use std::sync::RwLock;

use blobcast_core::Destination;
use serde::Serialize;
use tracing::{debug, warn};

/// Accounting entry for one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferState {
    /// Whether the destination participates in batches.
    pub enabled: bool,
    /// Total bytes planned for the current batch.
    pub size: u64,
    /// Bytes transferred so far. Invariant: `transferred <= size`.
    pub transferred: u64,
}

impl TransferState {
    fn fresh() -> Self {
        Self {
            enabled: true,
            size: 0,
            transferred: 0,
        }
    }
}

/// Keyed state store: one [`TransferState`] per destination name.
pub struct TransferLedger {
    inner: RwLock<HashMap<String, TransferState>>,
}

impl TransferLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Rebuilds the ledger for a new destination list.
    ///
    /// Every destination gets `{enabled: true, size: 0, transferred: 0}`,
    /// discarding prior enable/disable choices. Entries for removed
    /// destinations are dropped. Idempotent.
    pub fn reset(&self, destinations: &[Destination]) {
        let mut inner = self.inner.write().unwrap();
        inner.clear();
        for dest in destinations {
            inner.insert(dest.name.clone(), TransferState::fresh());
        }
    }

    /// Toggles a destination.
    ///
    /// Disabling zeroes its counters; the entry stays inert until the
    /// next reset. Enabling leaves the counters at zero.
    pub fn set_enabled(&self, name: &str, enabled: bool) {
        let mut inner = self.inner.write().unwrap();
        let Some(state) = inner.get_mut(name) else {
            warn!(destination = %name, "toggle for unknown destination ignored");
            return;
        };
        state.enabled = enabled;
        if !enabled {
            state.size = 0;
            state.transferred = 0;
        }
    }

    /// Returns whether a destination is currently enabled.
    ///
    /// Unknown destinations count as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap();
        inner.get(name).is_some_and(|s| s.enabled)
    }

    /// Sizes the ledger for a new batch.
    ///
    /// Sets `size = total` for every enabled entry under a single write
    /// lock, leaving `transferred` untouched. Disabled entries are not
    /// touched and receive no transfers.
    pub fn begin_batch(&self, total: u64) {
        let mut inner = self.inner.write().unwrap();
        for state in inner.values_mut() {
            if state.enabled {
                state.size = total;
            }
        }
    }

    /// Adds `bytes` to a destination's transferred counter.
    ///
    /// Monotonic, capped at `size`. Increments against unknown or
    /// disabled entries are dropped.
    pub fn record_transferred(&self, name: &str, bytes: u64) {
        let mut inner = self.inner.write().unwrap();
        let Some(state) = inner.get_mut(name) else {
            warn!(destination = %name, "progress for unknown destination ignored");
            return;
        };
        if !state.enabled {
            debug!(destination = %name, "progress for disabled destination ignored");
            return;
        }
        let next = state.transferred.saturating_add(bytes);
        if next > state.size {
            warn!(
                destination = %name,
                transferred = next,
                size = state.size,
                "transferred would exceed planned size, capping"
            );
        }
        state.transferred = next.min(state.size);
    }

    /// Returns the current state for one destination.
    pub fn get(&self, name: &str) -> Option<TransferState> {
        let inner = self.inner.read().unwrap();
        inner.get(name).cloned()
    }

    /// Returns a copy of the whole ledger.
    pub fn snapshot(&self) -> HashMap<String, TransferState> {
        let inner = self.inner.read().unwrap();
        inner.clone()
    }
}

impl Default for TransferLedger {
    fn default() -> Self {
        Self::new()
    }
}
