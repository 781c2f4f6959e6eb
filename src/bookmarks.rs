use std::path::Path;
use tracing::{info, warn};

use crate::models::Article;
use crate::store::PersistedStore;

const STORAGE_KEY: &str = "bookmarks";

/// Saved articles keyed by URL, in the order they were bookmarked.
///
/// Every mutation re-reads the stored set, applies the change, and writes the
/// whole set back, so two open stores never overwrite each other's additions.
pub struct BookmarkStore {
    store: PersistedStore<Vec<Article>>,
    items: Vec<Article>,
}

impl BookmarkStore {
    pub fn open(data_dir: &Path) -> Self {
        Self::with_store(PersistedStore::new(data_dir, STORAGE_KEY))
    }

    pub fn with_store(store: PersistedStore<Vec<Article>>) -> Self {
        let items = store.load();
        Self { store, items }
    }

    /// Returns false if an article with the same URL is already saved.
    pub fn add(&mut self, article: Article) -> bool {
        let url = article.url.clone();
        let added = self.mutate(|items| {
            if items.iter().any(|a| a.url == article.url) {
                return false;
            }
            items.push(article.clone());
            true
        });
        if added {
            info!(url = %url, "bookmark added");
        }
        added
    }

    pub fn remove(&mut self, url: &str) -> bool {
        let removed = self.mutate(|items| {
            let before = items.len();
            items.retain(|a| a.url != url);
            items.len() != before
        });
        if removed {
            info!(url, "bookmark removed");
        }
        removed
    }

    /// Flips membership and returns whether the article is now bookmarked.
    pub fn toggle(&mut self, article: &Article) -> bool {
        if self.contains(&article.url) {
            self.remove(&article.url);
            false
        } else {
            self.add(article.clone());
            true
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.items.iter().any(|a| a.url == url)
    }

    pub fn get(&self, url: &str) -> Option<&Article> {
        self.items.iter().find(|a| a.url == url)
    }

    pub fn list(&self) -> &[Article] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Picks up changes written by another store on the same file.
    pub fn reload(&mut self) {
        self.items = self.store.load();
    }

    fn mutate<F>(&mut self, f: F) -> bool
    where
        F: Fn(&mut Vec<Article>) -> bool,
    {
        match self.store.update(|items| f(items)) {
            Ok((items, changed)) => {
                self.items = items;
                changed
            }
            Err(e) => {
                // Keep the in-memory view in step even if the write failed.
                warn!(error = %e, "failed to persist bookmarks");
                f(&mut self.items)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn article(n: u32) -> Article {
        Article::new(format!("Story {}", n), format!("https://example.com/{}", n))
    }

    #[test]
    fn add_then_contains() {
        let dir = TempDir::new().unwrap();
        let mut store = BookmarkStore::open(dir.path());

        assert!(store.add(article(1)));
        assert!(store.contains("https://example.com/1"));
        assert!(!store.contains("https://example.com/2"));
    }

    #[test]
    fn add_is_idempotent_by_url() {
        let dir = TempDir::new().unwrap();
        let mut store = BookmarkStore::open(dir.path());

        store.add(article(1));
        let mut renamed = article(1);
        renamed.title = "Different title".to_string();
        assert!(!store.add(renamed));

        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "Story 1");
    }

    #[test]
    fn remove_then_not_contains() {
        let dir = TempDir::new().unwrap();
        let mut store = BookmarkStore::open(dir.path());
        store.add(article(1));

        assert!(store.remove("https://example.com/1"));
        assert!(!store.contains("https://example.com/1"));
        assert!(!store.remove("https://example.com/1"));
    }

    #[test]
    fn list_keeps_insertion_order_and_persists() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = BookmarkStore::open(dir.path());
            store.add(article(3));
            store.add(article(1));
            store.add(article(2));
        }

        let reopened = BookmarkStore::open(dir.path());
        let urls: Vec<_> = reopened.list().iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/3",
                "https://example.com/1",
                "https://example.com/2"
            ]
        );
    }

    #[test]
    fn toggle_flips_membership() {
        let dir = TempDir::new().unwrap();
        let mut store = BookmarkStore::open(dir.path());

        assert!(store.toggle(&article(7)));
        assert!(store.contains("https://example.com/7"));
        assert!(!store.toggle(&article(7)));
        assert!(store.is_empty());
    }

    #[test]
    fn two_stores_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let mut home = BookmarkStore::open(dir.path());
        let mut saved_view = BookmarkStore::open(dir.path());

        home.add(article(1));
        saved_view.add(article(2));

        home.reload();
        assert_eq!(home.len(), 2);
        assert_eq!(BookmarkStore::open(dir.path()).len(), 2);
    }

    #[test]
    fn unreadable_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.json");
        let stored = r#"[
  {"title": "Kept", "url": "https://a"},
  {"url": "https://b"}
]"#;
        std::fs::write(&path, stored).unwrap();

        let mut store = BookmarkStore::open(dir.path());
        assert!(store.is_empty());
        assert!(store.add(Article::new("New", "https://c")));
        assert!(store.contains("https://c"));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), stored);
    }

    #[test]
    fn failed_save_still_updates_memory() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        std::fs::write(&not_a_dir, "").unwrap();
        let mut store = BookmarkStore::open(&not_a_dir);

        assert!(store.add(article(1)));
        assert!(store.contains("https://example.com/1"));
        assert!(!store.add(article(1)));

        assert!(store.remove("https://example.com/1"));
        assert!(store.is_empty());
    }
}
