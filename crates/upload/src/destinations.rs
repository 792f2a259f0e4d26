//! Destination list tied to the transfer ledger.

use std::sync::Arc;

use blobcast_core::Destination;
use blobcast_ledger::TransferLedger;
use tracing::info;

/// The configured destinations and their shared accounting ledger.
///
/// The list is supplied externally and frozen for the duration of a
/// batch. Membership changes go through [`replace`](Self::replace),
/// which resets the whole ledger — prior enable/disable choices are
/// deliberately discarded.
pub struct DestinationSet {
    destinations: Vec<Destination>,
    ledger: Arc<TransferLedger>,
}

impl DestinationSet {
    /// Creates the set with a fresh ledger entry per destination.
    pub fn new(destinations: Vec<Destination>) -> Self {
        let ledger = Arc::new(TransferLedger::new());
        ledger.reset(&destinations);
        Self {
            destinations,
            ledger,
        }
    }

    /// Replaces the destination list and resets every ledger entry.
    pub fn replace(&mut self, destinations: Vec<Destination>) {
        info!(count = destinations.len(), "destination list replaced");
        self.ledger.reset(&destinations);
        self.destinations = destinations;
    }

    /// Toggles one destination between batches.
    pub fn set_enabled(&self, name: &str, enabled: bool) {
        self.ledger.set_enabled(name, enabled);
    }

    /// Returns the destinations in declaration order.
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Returns a handle to the shared ledger.
    pub fn ledger(&self) -> Arc<TransferLedger> {
        Arc::clone(&self.ledger)
    }
}
