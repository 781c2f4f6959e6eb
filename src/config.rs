//! Runtime configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 9;

const DEFAULT_NEWSAPI_URL: &str = "https://newsapi.org/v2";
const DEFAULT_MEDIASTACK_URL: &str = "http://api.mediastack.com/v1";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub page_size: u32,
    pub http_timeout: Duration,

    pub newsapi_url: String,
    pub newsapi_key: Option<String>,
    pub newsapi_country: String,

    pub mediastack_url: String,
    pub mediastack_key: Option<String>,
    pub mediastack_country: String,
    pub mediastack_limit: u32,
    /// Entries kept by the fallback response cache. Zero disables it.
    pub cache_capacity: usize,

    pub openai_url: String,
    pub openai_key: Option<String>,
    pub summary_model: String,
    pub summary_max_tokens: u32,
    pub summary_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout: Duration::from_secs(30),
            newsapi_url: DEFAULT_NEWSAPI_URL.to_string(),
            newsapi_key: None,
            newsapi_country: "us".to_string(),
            mediastack_url: DEFAULT_MEDIASTACK_URL.to_string(),
            mediastack_key: None,
            mediastack_country: "gb".to_string(),
            mediastack_limit: 10,
            cache_capacity: 128,
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            openai_key: None,
            summary_model: "gpt-4".to_string(),
            summary_max_tokens: 150,
            summary_temperature: 0.7,
        }
    }
}

impl Config {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            data_dir: resolve_data_dir(),
            page_size: env_parse("NEWSDECK_PAGE_SIZE")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.page_size),
            http_timeout: env_parse("NEWSDECK_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            newsapi_url: env_string("NEWSAPI_URL").unwrap_or(defaults.newsapi_url),
            newsapi_key: env_string("NEWSAPI_KEY"),
            newsapi_country: env_string("NEWSAPI_COUNTRY").unwrap_or(defaults.newsapi_country),
            mediastack_url: env_string("MEDIASTACK_URL").unwrap_or(defaults.mediastack_url),
            mediastack_key: env_string("MEDIASTACK_KEY"),
            mediastack_country: env_string("MEDIASTACK_COUNTRY")
                .unwrap_or(defaults.mediastack_country),
            mediastack_limit: env_parse("MEDIASTACK_LIMIT").unwrap_or(defaults.mediastack_limit),
            cache_capacity: env_parse("NEWSDECK_CACHE_CAPACITY")
                .unwrap_or(defaults.cache_capacity),
            openai_url: env_string("OPENAI_URL").unwrap_or(defaults.openai_url),
            openai_key: env_string("OPENAI_API_KEY"),
            summary_model: env_string("NEWSDECK_SUMMARY_MODEL").unwrap_or(defaults.summary_model),
            summary_max_tokens: defaults.summary_max_tokens,
            summary_temperature: defaults.summary_temperature,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("newsdeck.log")
    }
}

fn resolve_data_dir() -> PathBuf {
    if let Some(dir) = env_string("NEWSDECK_DATA_DIR") {
        return PathBuf::from(shellexpand::tilde(&dir).to_string());
    }
    // XDG data directory standard
    if let Some(xdg_data) = env_string("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data).join("newsdeck");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/share/newsdeck")
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = Config::default();
        assert_eq!(config.page_size, 9);
        assert_eq!(config.newsapi_country, "us");
        assert_eq!(config.mediastack_country, "gb");
        assert_eq!(config.mediastack_limit, 10);
        assert_eq!(config.summary_model, "gpt-4");
        assert!(config.newsapi_key.is_none());
    }

    #[test]
    fn log_file_lives_in_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/newsdeck-test"),
            ..Config::default()
        };
        assert_eq!(config.log_file(), PathBuf::from("/tmp/newsdeck-test/newsdeck.log"));
    }
}
