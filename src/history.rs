use std::path::Path;
use tracing::warn;

use crate::store::PersistedStore;

const STORAGE_KEY: &str = "search_history";
pub const MAX_ENTRIES: usize = 10;

/// Recently submitted search terms, newest first, without duplicates.
pub struct SearchHistory {
    store: PersistedStore<Vec<String>>,
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn open(data_dir: &Path) -> Self {
        Self::with_store(PersistedStore::new(data_dir, STORAGE_KEY))
    }

    pub fn with_store(store: PersistedStore<Vec<String>>) -> Self {
        let mut entries = store.load();
        entries.truncate(MAX_ENTRIES);
        Self { store, entries }
    }

    /// Records a submitted search. Blank terms and terms already present
    /// leave the history untouched.
    pub fn record(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }
        let term = term.to_string();
        self.mutate(move |entries| {
            if entries.contains(&term) {
                return false;
            }
            entries.insert(0, term.clone());
            entries.truncate(MAX_ENTRIES);
            true
        })
    }

    pub fn remove(&mut self, term: &str) -> bool {
        self.mutate(|entries| {
            let before = entries.len();
            entries.retain(|t| t != term);
            entries.len() != before
        })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn mutate<F>(&mut self, f: F) -> bool
    where
        F: Fn(&mut Vec<String>) -> bool,
    {
        match self.store.update(|entries| f(entries)) {
            Ok((entries, changed)) => {
                self.entries = entries;
                changed
            }
            Err(e) => {
                warn!(error = %e, "failed to persist search history");
                f(&mut self.entries)
            }
        }
    }
}
