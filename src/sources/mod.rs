//! Headline providers.
//!
//! Both adapters turn every failure into an empty list and a log line, so the
//! feed only ever sees "some articles" or "no articles".

mod cache;
mod mediastack;
mod newsapi;

pub use cache::ResponseCache;
pub use mediastack::MediastackSource;
pub use newsapi::NewsApiSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::error::Result;
use crate::models::Article;

const USER_AGENT: &str = "newsdeck/0.1";

/// The preferred headline provider, queried by category and page number.
#[async_trait]
pub trait PrimarySource: Send + Sync {
    async fn fetch(
        &self,
        category: &str,
        search_term: &str,
        page: u32,
        page_size: u32,
    ) -> Vec<Article>;
}

/// The fallback provider, queried by keyword and item offset.
#[async_trait]
pub trait SecondarySource: Send + Sync {
    async fn fetch(&self, search_term: &str, offset: u32) -> Vec<Article>;
}

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Accepts RFC 3339 timestamps; anything else is treated as unknown.
pub(crate) fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|d| d.with_timezone(&Utc))
}

/// Some providers send the source as a bare name, others as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SourceField {
    Name(String),
    Object { name: Option<String> },
}

impl SourceField {
    pub(crate) fn into_name(self) -> Option<String> {
        match self {
            SourceField::Name(name) => Some(name),
            SourceField::Object { name } => name,
        }
        .filter(|n| !n.trim().is_empty())
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
