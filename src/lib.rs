//! newsdeck: a terminal headline browser with a fallback news source,
//! infinite scrolling, search history, bookmarks and AI summaries.

pub mod bookmarks;
pub mod config;
pub mod error;
pub mod feed;
pub mod history;
pub mod models;
pub mod sources;
pub mod store;
pub mod summary;
pub mod viewer;

pub use bookmarks::BookmarkStore;
pub use config::Config;
pub use error::{NewsError, Result};
pub use feed::{ArticleFeed, LoadOutcome, PageLoad, PageOrigin, PendingLoad};
pub use history::SearchHistory;
pub use models::{Article, Category, FeedQuery, FeedState};
pub use store::PersistedStore;
pub use summary::Summarizer;
