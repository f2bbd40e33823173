//! Calculation history.
//!
//! [`History`] is the bounded, newest-first list. [`HistoryBook`] pairs it with
//! a [`KeyValueStore`] and writes the whole list back after every mutation.
//! Store failures are logged and never roll back the in-memory change; a
//! missing or unreadable stored list loads as empty.

use chrono::Utc;

use abacus_types::HistoryEntry;

use crate::store::KeyValueStore;

pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Key the serialized history lives under.
pub const HISTORY_KEY: &str = "calculatorHistory";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Build from stored entries, keeping only the newest `MAX_HISTORY_ENTRIES`.
    #[must_use]
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(MAX_HISTORY_ENTRIES);
        Self { entries }
    }

    /// Prepend an entry, evicting the oldest past the cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub struct HistoryBook {
    history: History,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for HistoryBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryBook")
            .field("entries", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl HistoryBook {
    /// Load the stored history. Never fails: bad or missing data is empty.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let history = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => History::from_entries(entries),
                Err(e) => {
                    tracing::warn!("Stored history is corrupt, starting empty: {e}");
                    History::default()
                }
            },
            Ok(None) => History::default(),
            Err(e) => {
                tracing::warn!("Failed to load history: {e}");
                History::default()
            }
        };
        tracing::debug!(entries = history.len(), "History loaded");
        Self { history, store }
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record a completed calculation.
    pub fn record(&mut self, operation_label: impl Into<String>, result: f64) {
        self.history
            .push(HistoryEntry::new(operation_label, result, Utc::now()));
        self.persist();
    }

    /// Result stored at `index` (0 is newest).
    #[must_use]
    pub fn replay(&self, index: usize) -> Option<f64> {
        self.history.get(index).map(|entry| entry.result)
    }

    /// Empty the history. Confirmation is the caller's job.
    pub fn clear(&mut self) {
        self.history.clear();
        self.persist();
    }

    fn persist(&self) {
        let serialized = match serde_json::to_string(self.history.entries()) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!("Failed to serialize history: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &serialized) {
            tracing::warn!("Failed to save history: {e}");
        }
    }
}
