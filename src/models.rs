use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

const NO_DESCRIPTION: &str = "No summary available for this article.";

/// A single headline, normalized from whichever source produced it.
///
/// Identity is the `url`: two articles with the same URL compare equal no
/// matter how their other fields differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: url.into(),
            image_url: None,
            published_at: None,
            source_name: None,
        }
    }

    /// Image URL with `http://` upgraded to `https://`
    pub fn secure_image_url(&self) -> Option<String> {
        let url = self.image_url.as_deref().filter(|u| !u.is_empty())?;
        Some(match url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => url.to_string(),
        })
    }

    pub fn display_source(&self) -> &str {
        self.source_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }

    pub fn display_date(&self) -> String {
        self.published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Article {}

impl Hash for Article {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

/// Headline categories offered for filtering. `All` is the empty wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Business,
    Technology,
    Health,
    Science,
    Sports,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::Business,
        Category::Technology,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Entertainment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
        }
    }

    pub fn wire_value(self) -> &'static str {
        match self {
            Category::All => "",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        let value = value.trim().to_lowercase();
        if value == "all" {
            return Some(Category::All);
        }
        Self::ALL.into_iter().find(|c| c.wire_value() == value)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Category {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Category {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The query an epoch of the feed is loading. An empty category means all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub category: String,
    pub search_term: String,
    pub page: u32,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            category: String::new(),
            search_term: String::new(),
            page: 1,
        }
    }
}

/// Observable state of one feed epoch.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub articles: Vec<Article>,
    pub loaded_pages: BTreeSet<u32>,
    pub is_loading: bool,
    pub is_end: bool,
}
