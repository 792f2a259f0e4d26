//! Additive file selection.

use blobcast_core::LocalFile;

/// The user's current file selection.
///
/// Selections are additive: newly picked files append in pick order
/// rather than replacing the set. A batch consumes the selection —
/// [`clear`](Self::clear) runs once every enabled destination has
/// finished its pass, independent of per-destination outcomes.
#[derive(Debug, Default)]
pub struct Selection {
    files: Vec<LocalFile>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends files to the selection, preserving pick order.
    pub fn add(&mut self, files: impl IntoIterator<Item = LocalFile>) {
        self.files.extend(files);
    }

    /// Returns the selected files in order.
    pub fn files(&self) -> &[LocalFile] {
        &self.files
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the number of selected files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.files.clear();
    }
}
