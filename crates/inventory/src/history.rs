//! Append-only history of ledger entries.

use chrono::{DateTime, Utc};

use crate::entry::LedgerEntry;

/// Ordered sequence of ledger entries.
///
/// Canonical order is append order (oldest first); presentation may reverse
/// it via [`HistoryStore::newest_first`]. Entries are never edited. Only the
/// owning engine can replace or clear the whole sequence (restore / reset).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStore {
    entries: Vec<LedgerEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry at the end of the canonical order.
    pub(crate) fn append(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Full replay, oldest first.
    pub fn all(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// The most recent `n` entries, still in canonical (oldest-first) order.
    pub fn tail(&self, n: usize) -> &[LedgerEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Presentation order used by exports and history views.
    pub fn newest_first(&self) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.entries.iter().rev()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence number the next appended entry will carry.
    pub fn next_sequence(&self) -> u64 {
        self.entries.len() as u64 + 1
    }

    /// Clamp a candidate creation time so timestamps never go backwards.
    pub fn monotonic_timestamp(&self, candidate: DateTime<Utc>) -> DateTime<Utc> {
        match self.entries.last() {
            Some(last) if last.recorded_at > candidate => last.recorded_at,
            _ => candidate,
        }
    }

    /// Atomically swap the whole sequence.
    pub(crate) fn replace(&mut self, entries: Vec<LedgerEntry>) {
        self.entries = entries;
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
