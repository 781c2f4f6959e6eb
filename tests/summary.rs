use newsdeck::{Article, Config, Summarizer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        openai_url: format!("{}/v1", server.uri()),
        openai_key: Some("sk-test".to_string()),
        ..Config::default()
    }
}

fn article() -> Article {
    let mut article = Article::new("Rates held steady", "https://wire.test/rates");
    article.description = Some("The central bank kept rates unchanged.".to_string());
    article
}

#[tokio::test]
async fn summary_is_trimmed_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4", "max_tokens": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Rates unchanged.\nMarkets calm.  "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summarizer = Summarizer::new(&config_for(&server)).unwrap();
    let summary = summarizer.summarize(&article()).await;

    assert_eq!(summary.as_deref(), Some("Rates unchanged.\nMarkets calm."));
}

#[tokio::test]
async fn missing_choices_yield_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let summarizer = Summarizer::new(&config_for(&server)).unwrap();
    assert_eq!(summarizer.summarize(&article()).await, None);
}

#[tokio::test]
async fn server_error_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let summarizer = Summarizer::new(&config_for(&server)).unwrap();
    assert_eq!(summarizer.summarize(&article()).await, None);
}
