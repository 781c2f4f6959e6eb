//! Best-effort article summaries from an OpenAI-compatible chat endpoint.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{NewsError, Result};
use crate::models::Article;
use crate::sources::build_client;

pub struct Summarizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

pub fn build_prompt(article: &Article) -> String {
    format!(
        "Summarize the following news article in three lines:\n\n{}\n\n{}",
        article.title,
        article.description.as_deref().unwrap_or("")
    )
}

impl Summarizer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(config.http_timeout)?,
            base_url: config.openai_url.trim_end_matches('/').to_string(),
            api_key: config.openai_key.clone(),
            model: config.summary_model.clone(),
            max_tokens: config.summary_max_tokens,
            temperature: config.summary_temperature,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns a short summary, or `None` if one could not be produced.
    pub async fn summarize(&self, article: &Article) -> Option<String> {
        match self.request(article).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(url = %article.url, error = %e, "summary request failed");
                None
            }
        }
    }

    async fn request(&self, article: &Article) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NewsError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let prompt = build_prompt(article);
        debug!(url = %article.url, "requesting summary");

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::Status(response.status()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Decode(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()))
    }
}
