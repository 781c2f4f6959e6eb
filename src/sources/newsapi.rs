use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{build_client, non_empty, parse_timestamp, PrimarySource, SourceField};
use crate::config::Config;
use crate::error::{NewsError, Result};
use crate::models::Article;

/// Category sent when the caller asks for all categories.
const DEFAULT_CATEGORY: &str = "general";
/// Placeholder NewsAPI returns for articles pulled by the publisher.
const REMOVED_MARKER: &str = "[Removed]";

/// Primary source backed by a NewsAPI-compatible `top-headlines` endpoint.
pub struct NewsApiSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    country: String,
}

#[derive(Debug, Deserialize)]
struct TopHeadlines {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<SourceField>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

impl NewsApiSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(config.http_timeout)?,
            base_url: config.newsapi_url.trim_end_matches('/').to_string(),
            api_key: config.newsapi_key.clone(),
            country: config.newsapi_country.clone(),
        })
    }

    async fn fetch_page(
        &self,
        category: &str,
        search_term: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Article>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NewsError::Config("NEWSAPI_KEY is not set".to_string()))?;

        let category = if category.is_empty() { DEFAULT_CATEGORY } else { category };
        let mut params = vec![
            ("country", self.country.clone()),
            ("category", category.to_string()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
            ("apiKey", api_key.to_string()),
        ];
        if !search_term.is_empty() {
            params.push(("q", search_term.to_string()));
        }

        let url = format!("{}/top-headlines", self.base_url);
        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: TopHeadlines = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(NewsError::Status(status)),
            Err(e) => return Err(NewsError::Decode(e.to_string())),
        };

        if parsed.status != "ok" {
            let message = parsed
                .message
                .or(parsed.code)
                .unwrap_or_else(|| format!("status {}", parsed.status));
            return Err(NewsError::Api(message));
        }
        if !status.is_success() {
            return Err(NewsError::Status(status));
        }

        Ok(parsed.articles.into_iter().filter_map(normalize).collect())
    }
}

fn normalize(raw: RawArticle) -> Option<Article> {
    let url = non_empty(raw.url)?;
    let title = non_empty(raw.title).unwrap_or_else(|| "Untitled".to_string());
    if title == REMOVED_MARKER {
        return None;
    }

    Some(Article {
        title,
        description: non_empty(raw.description),
        url,
        image_url: non_empty(raw.url_to_image),
        published_at: parse_timestamp(raw.published_at.as_deref()),
        source_name: raw.source.and_then(SourceField::into_name),
    })
}

#[async_trait]
impl PrimarySource for NewsApiSource {
    async fn fetch(
        &self,
        category: &str,
        search_term: &str,
        page: u32,
        page_size: u32,
    ) -> Vec<Article> {
        match self.fetch_page(category, search_term, page, page_size).await {
            Ok(articles) => {
                debug!(page, count = articles.len(), "newsapi page fetched");
                if articles.is_empty() {
                    warn!(category, search_term, page, "newsapi returned no articles");
                }
                articles
            }
            Err(e) => {
                warn!(category, search_term, page, error = %e, "newsapi request failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_fields() {
        let raw: RawArticle = serde_json::from_str(
            r#"{
                "source": {"id": "the-verge", "name": "The Verge"},
                "author": "Someone",
                "title": "Chips are fast",
                "description": "A story",
                "url": "https://example.com/chips",
                "urlToImage": "http://example.com/chips.png",
                "publishedAt": "2025-05-01T12:00:00Z",
                "content": "Body [+1200 chars]"
            }"#,
        )
        .unwrap();

        let article = normalize(raw).unwrap();
        assert_eq!(article.title, "Chips are fast");
        assert_eq!(article.url, "https://example.com/chips");
        assert_eq!(article.image_url.as_deref(), Some("http://example.com/chips.png"));
        assert_eq!(article.source_name.as_deref(), Some("The Verge"));
        assert!(article.published_at.is_some());
    }

    #[test]
    fn normalize_drops_removed_and_urlless_entries() {
        let removed: RawArticle = serde_json::from_str(
            r#"{"title": "[Removed]", "url": "https://removed.com"}"#,
        )
        .unwrap();
        assert!(normalize(removed).is_none());

        let no_url: RawArticle = serde_json::from_str(r#"{"title": "Orphan"}"#).unwrap();
        assert!(normalize(no_url).is_none());
    }
}
