//! Paginated, fallback-aware article feed.
//!
//! The feed owns the state for one `(category, search_term)` epoch. A page
//! load is split into three steps so a UI can run the network part on a
//! background task while it keeps handling input:
//!
//! 1. [`ArticleFeed::begin_load`] checks the guard and marks the feed loading.
//! 2. [`PendingLoad::run`] queries the primary source, then the fallback.
//! 3. [`ArticleFeed::complete`] applies the page, or drops it when the epoch
//!    has moved on since the load began.
//!
//! [`ArticleFeed::load_next_page`] chains the three for sequential callers.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{Article, FeedQuery, FeedState};
use crate::sources::{PrimarySource, SecondarySource};

/// Which provider filled a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    Primary,
    Secondary,
}

/// Result of applying (or refusing) a page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The guard refused the load: already loading, at the end, or the page
    /// is already in.
    Skipped,
    Loaded {
        page: u32,
        added: usize,
        is_end: bool,
        origin: PageOrigin,
    },
    /// The load finished after a reset; its articles were discarded.
    Stale { epoch: u64 },
}

/// A page load that passed the guard and has not run yet.
pub struct PendingLoad {
    epoch: u64,
    query: FeedQuery,
    page_size: u32,
    primary: Arc<dyn PrimarySource>,
    secondary: Arc<dyn SecondarySource>,
}

/// Articles fetched for one page, tagged with the epoch that requested them.
#[derive(Debug, Clone)]
pub struct PageLoad {
    pub epoch: u64,
    pub page: u32,
    pub articles: Vec<Article>,
    pub origin: PageOrigin,
}

impl PendingLoad {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    /// Primary first; the fallback is only asked once the primary call has
    /// resolved with nothing.
    pub async fn run(self) -> PageLoad {
        let FeedQuery {
            category,
            search_term,
            page,
        } = self.query;

        let articles = self
            .primary
            .fetch(&category, &search_term, page, self.page_size)
            .await;
        if !articles.is_empty() {
            return PageLoad {
                epoch: self.epoch,
                page,
                articles,
                origin: PageOrigin::Primary,
            };
        }

        let offset = page.saturating_sub(1).saturating_mul(self.page_size);
        debug!(page, offset, "primary source empty, using fallback");
        let articles = self.secondary.fetch(&search_term, offset).await;
        PageLoad {
            epoch: self.epoch,
            page,
            articles,
            origin: PageOrigin::Secondary,
        }
    }
}

pub struct ArticleFeed {
    primary: Arc<dyn PrimarySource>,
    secondary: Arc<dyn SecondarySource>,
    page_size: u32,
    query: FeedQuery,
    epoch: u64,
    state: FeedState,
}

impl ArticleFeed {
    pub fn new(
        primary: Arc<dyn PrimarySource>,
        secondary: Arc<dyn SecondarySource>,
        page_size: u32,
    ) -> Self {
        Self {
            primary,
            secondary,
            page_size: page_size.max(1),
            query: FeedQuery::default(),
            epoch: 0,
            state: FeedState::default(),
        }
    }

    /// Starts a new epoch for the given query. Everything loaded so far is
    /// dropped, and a load still in flight will be discarded on completion.
    pub fn reset_epoch(&mut self, category: &str, search_term: &str) {
        self.epoch += 1;
        self.query = FeedQuery {
            category: category.to_string(),
            search_term: search_term.to_string(),
            page: 1,
        };
        self.state = FeedState::default();
        info!(epoch = self.epoch, category, search_term, "feed reset");
    }

    /// Applies the load guard and, if it passes, marks the feed as loading.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        let page = self.query.page;
        if self.state.is_loading || self.state.is_end || self.state.loaded_pages.contains(&page) {
            debug!(
                page,
                is_loading = self.state.is_loading,
                is_end = self.state.is_end,
                "load skipped"
            );
            return None;
        }

        self.state.is_loading = true;
        Some(PendingLoad {
            epoch: self.epoch,
            query: self.query.clone(),
            page_size: self.page_size,
            primary: Arc::clone(&self.primary),
            secondary: Arc::clone(&self.secondary),
        })
    }

    /// Applies a finished page load to the current epoch.
    pub fn complete(&mut self, load: PageLoad) -> LoadOutcome {
        if load.epoch != self.epoch {
            debug!(
                stale_epoch = load.epoch,
                current_epoch = self.epoch,
                "discarding stale page"
            );
            return LoadOutcome::Stale { epoch: load.epoch };
        }

        self.state.is_loading = false;
        if !self.state.loaded_pages.insert(load.page) {
            return LoadOutcome::Skipped;
        }

        // Short page means the sources are exhausted for this epoch.
        let is_end = load.articles.len() < self.page_size as usize;
        if is_end {
            self.state.is_end = true;
        }

        if load.page == 1 {
            self.state.articles.clear();
        }
        let mut seen: HashSet<String> = self
            .state
            .articles
            .iter()
            .map(|a| a.url.clone())
            .collect();
        let before = self.state.articles.len();
        for article in load.articles {
            if seen.insert(article.url.clone()) {
                self.state.articles.push(article);
            }
        }
        let added = self.state.articles.len() - before;

        info!(
            epoch = self.epoch,
            page = load.page,
            added,
            total = self.state.articles.len(),
            is_end = self.state.is_end,
            "page loaded"
        );
        LoadOutcome::Loaded {
            page: load.page,
            added,
            is_end: self.state.is_end,
            origin: load.origin,
        }
    }

    /// Loads the current page in place. A no-op when the guard refuses.
    pub async fn load_next_page(&mut self) -> LoadOutcome {
        match self.begin_load() {
            Some(pending) => {
                let load = pending.run().await;
                self.complete(load)
            }
            None => LoadOutcome::Skipped,
        }
    }

    /// Moves to the next page when the reader reaches the bottom of the list.
    ///
    /// Repeated triggers collapse: nothing happens while a load is running,
    /// after the end was reached, or before the current page has arrived.
    pub fn advance_page(&mut self) -> bool {
        if self.state.is_loading
            || self.state.is_end
            || !self.state.loaded_pages.contains(&self.query.page)
        {
            return false;
        }
        self.query.page += 1;
        true
    }

    pub fn articles(&self) -> &[Article] {
        &self.state.articles
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn is_end(&self) -> bool {
        self.state.is_end
    }

    pub fn loaded_pages(&self) -> &BTreeSet<u32> {
        &self.state.loaded_pages
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
