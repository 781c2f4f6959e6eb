use std::sync::Arc;
use std::time::Duration;

use newsdeck::sources::{MediastackSource, NewsApiSource, PrimarySource, SecondarySource};
use newsdeck::{ArticleFeed, Config, LoadOutcome, PageOrigin};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        newsapi_url: format!("{}/v2", server.uri()),
        newsapi_key: Some("news-key".to_string()),
        mediastack_url: format!("{}/v1", server.uri()),
        mediastack_key: Some("stack-key".to_string()),
        http_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

fn newsapi_articles(count: usize) -> serde_json::Value {
    let articles: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "source": {"id": null, "name": "Wire"},
                "author": null,
                "title": format!("Headline {}", i),
                "description": "desc",
                "url": format!("https://wire.test/{}", i),
                "urlToImage": null,
                "publishedAt": "2025-05-01T12:00:00Z",
                "content": null
            })
        })
        .collect();
    json!({"status": "ok", "totalResults": count, "articles": articles})
}

fn mediastack_items(count: usize) -> serde_json::Value {
    let data: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "author": null,
                "title": format!("Fallback {}", i),
                "description": "alt desc",
                "url": format!("https://alt.test/{}", i),
                "source": "AltWire",
                "image": null,
                "category": "general",
                "language": "en",
                "country": "gb",
                "published_at": "2025-05-01T08:00:00+00:00"
            })
        })
        .collect();
    json!({
        "pagination": {"limit": 10, "offset": 0, "count": count, "total": count},
        "data": data
    })
}

#[tokio::test]
async fn newsapi_sends_query_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("country", "us"))
        .and(query_param("category", "technology"))
        .and(query_param("q", "chips"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "9"))
        .and(query_param("apiKey", "news-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(newsapi_articles(3)))
        .expect(1)
        .mount(&server)
        .await;

    let source = NewsApiSource::new(&config_for(&server)).unwrap();
    let articles = source.fetch("technology", "chips", 2, 9).await;

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].title, "Headline 0");
    assert_eq!(articles[0].source_name.as_deref(), Some("Wire"));
}

#[tokio::test]
async fn newsapi_defaults_empty_category_to_general() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("category", "general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(newsapi_articles(1)))
        .expect(1)
        .mount(&server)
        .await;

    let source = NewsApiSource::new(&config_for(&server)).unwrap();
    assert_eq!(source.fetch("", "", 1, 9).await.len(), 1);
}

#[tokio::test]
async fn newsapi_errors_become_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid"
        })))
        .mount(&server)
        .await;

    let source = NewsApiSource::new(&config_for(&server)).unwrap();
    assert!(source.fetch("", "", 1, 9).await.is_empty());
}

#[tokio::test]
async fn newsapi_without_key_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(newsapi_articles(9)))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        newsapi_key: None,
        ..config_for(&server)
    };
    let source = NewsApiSource::new(&config).unwrap();
    assert!(source.fetch("", "", 1, 9).await.is_empty());
}

#[tokio::test]
async fn mediastack_caches_by_term_and_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/news"))
        .and(query_param("access_key", "stack-key"))
        .and(query_param("countries", "gb"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "9"))
        .and(query_param("keywords", "rain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mediastack_items(4)))
        .expect(1)
        .mount(&server)
        .await;

    let source = MediastackSource::new(&config_for(&server)).unwrap();
    let first = source.fetch("rain", 9).await;
    let second = source.fetch("rain", 9).await;

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
    assert_eq!(first[0].source_name.as_deref(), Some("AltWire"));
    assert_eq!(source.cached_entries(), 1);
}

#[tokio::test]
async fn mediastack_failures_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "usage_limit_reached", "message": "Monthly limit reached"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let source = MediastackSource::new(&config_for(&server)).unwrap();
    assert!(source.fetch("", 0).await.is_empty());
    assert!(source.fetch("", 0).await.is_empty());
    assert_eq!(source.cached_entries(), 0);
}

#[tokio::test]
async fn feed_falls_back_to_mediastack_when_newsapi_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(newsapi_articles(9)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(newsapi_articles(0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/news"))
        .and(query_param("offset", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mediastack_items(4)))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let mut feed = ArticleFeed::new(
        Arc::new(NewsApiSource::new(&config).unwrap()),
        Arc::new(MediastackSource::new(&config).unwrap()),
        config.page_size,
    );
    feed.reset_epoch("technology", "");

    let first = feed.load_next_page().await;
    assert!(matches!(
        first,
        LoadOutcome::Loaded { page: 1, added: 9, is_end: false, origin: PageOrigin::Primary }
    ));

    assert!(feed.advance_page());
    let second = feed.load_next_page().await;
    assert!(matches!(
        second,
        LoadOutcome::Loaded { page: 2, added: 4, is_end: true, origin: PageOrigin::Secondary }
    ));
    assert_eq!(feed.articles().len(), 13);
    assert!(!feed.advance_page());
}
