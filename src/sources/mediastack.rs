use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use tracing::{debug, warn};

use super::{build_client, non_empty, parse_timestamp, ResponseCache, SecondarySource, SourceField};
use crate::config::Config;
use crate::error::{NewsError, Result};
use crate::models::Article;

type CacheKey = (String, u32);

/// Fallback source backed by a Mediastack-compatible `news` endpoint.
///
/// Successful responses are cached by `(search_term, offset)` in a bounded
/// LRU; failures are never cached so a later retry can still succeed.
pub struct MediastackSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    country: String,
    limit: u32,
    cache: Mutex<ResponseCache<CacheKey, Vec<Article>>>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<RawItem>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<SourceField>,
}

impl MediastackSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(config.http_timeout)?,
            base_url: config.mediastack_url.trim_end_matches('/').to_string(),
            api_key: config.mediastack_key.clone(),
            country: config.mediastack_country.clone(),
            limit: config.mediastack_limit,
            cache: Mutex::new(ResponseCache::new(config.cache_capacity)),
        })
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn cached(&self, key: &CacheKey) -> Option<Vec<Article>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).get(key)
    }

    fn remember(&self, key: CacheKey, articles: Vec<Article>) {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, articles);
    }

    async fn fetch_offset(&self, search_term: &str, offset: u32) -> Result<Vec<Article>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NewsError::Config("MEDIASTACK_KEY is not set".to_string()))?;

        let mut params = vec![
            ("access_key", api_key.to_string()),
            ("countries", self.country.clone()),
            ("limit", self.limit.to_string()),
            ("offset", offset.to_string()),
        ];
        if !search_term.is_empty() {
            params.push(("keywords", search_term.to_string()));
        }

        let url = format!("{}/news", self.base_url);
        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: NewsResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(NewsError::Status(status)),
            Err(e) => return Err(NewsError::Decode(e.to_string())),
        };

        if let Some(err) = parsed.error {
            let message = err
                .message
                .or(err.code)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(NewsError::Api(message));
        }
        if !status.is_success() {
            return Err(NewsError::Status(status));
        }

        Ok(parsed.data.into_iter().filter_map(normalize).collect())
    }
}

fn normalize(raw: RawItem) -> Option<Article> {
    Some(Article {
        url: non_empty(raw.url)?,
        title: non_empty(raw.title).unwrap_or_else(|| "Untitled".to_string()),
        description: non_empty(raw.description),
        image_url: non_empty(raw.image),
        published_at: parse_timestamp(raw.published_at.as_deref()),
        source_name: raw.source.and_then(SourceField::into_name),
    })
}

#[async_trait]
impl SecondarySource for MediastackSource {
    async fn fetch(&self, search_term: &str, offset: u32) -> Vec<Article> {
        let key = (search_term.to_string(), offset);
        if let Some(articles) = self.cached(&key) {
            debug!(search_term, offset, "mediastack cache hit");
            return articles;
        }

        match self.fetch_offset(search_term, offset).await {
            Ok(articles) => {
                debug!(offset, count = articles.len(), "mediastack page fetched");
                self.remember(key, articles.clone());
                articles
            }
            Err(e) => {
                warn!(search_term, offset, error = %e, "mediastack request failed");
                Vec::new()
            }
        }
    }
}
