use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fetcher: FetcherConfig,
    pub sources: SourcesConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

/// Outbound HTTP behaviour shared by every fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    /// Extra attempts after the first, for transient failures only.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
    /// Documents larger than this are skipped without parsing.
    pub max_document_bytes: usize,
}

/// Where candidates come from and how many of them are visited per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Search URL with a `{query}` placeholder.
    pub search_url_template: String,
    pub max_candidates: usize,
    pub max_downloads: usize,
    pub max_domain_visits: usize,
    /// Send HEAD to links without a `.pdf` path to check their content type.
    pub probe_content_type: bool,
    /// Links whose host or URL contains any of these are ignored.
    pub skip_words: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Phrases that must all appear in a document besides the identifier.
    pub required_phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with SCOUT prefix
            .add_source(
                Environment::with_prefix("SCOUT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("sources.skip_words")
                    .with_list_parse_key("validation.required_phrases")
                    .try_parsing(true),
            );

        config.build()?.try_deserialize()
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Delay before retry number `attempt` (1-based): base * 2^(attempt-1), capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        let delay = self.backoff_base_ms.saturating_mul(factor).min(self.backoff_max_ms);
        Duration::from_millis(delay)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_size: 1024 * 1024, // 1MB
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            max_retries: 2,
            backoff_base_ms: 200,
            backoff_max_ms: 5_000,
            pool_max_idle_per_host: 8,
            user_agent: format!("sds-scout/{}", env!("CARGO_PKG_VERSION")),
            max_document_bytes: 20 * 1024 * 1024, // 20MB
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            search_url_template: "https://html.duckduckgo.com/html/?q={query}".to_string(),
            max_candidates: 50,
            max_downloads: 5,
            max_domain_visits: 5,
            probe_content_type: true,
            skip_words: DEFAULT_SKIP_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            file_path: None,
        }
    }
}

/// Aggregators, social media, news, search engines and account pages that
/// never host a usable data sheet.
pub const DEFAULT_SKIP_WORDS: &[&str] = &[
    "guidechem", "chemicalbook", "commonchemistry", "alpha-chemistry", "lookchem",
    "pharmaffiliates", "benjaminmoore", "wikipedia", "imdb", "amazon", "ebay",
    "craigslist", "pinterest", "instagram", "tumblr", "reddit", "snapchat", "tiktok",
    "linkedin", "twitter", "x.com", "facebook", "youtube", "nytimes", "huffingtonpost",
    "forbes", "bloomberg", "bbc", "cnn", "foxnews", "nbcnews", "abcnews", "theguardian",
    "dailymail", "usatoday", "quora", "stackexchange", "stackoverflow", "tripadvisor",
    "yelp", "zomato", "opentable", "healthline", "webmd", "mayoclinic", "nih.gov",
    "cdc.gov", "fda.gov", "epa.gov", "google", "bing", "yahoo", "aol", "baidu", "msn",
    "duckduckgo", "yandex", "coursera", "udemy", "edx", "khanacademy", "scribd",
    "login", "register", "signup", "signin", "faq", "terms", "conditions", "privacy",
    "support", "help", "contact", "about", "my-account", "favourites", "bulkorder",
    "cart",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let fetcher = FetcherConfig {
            backoff_base_ms: 100,
            backoff_max_ms: 1_000,
            ..Default::default()
        };
        assert_eq!(fetcher.backoff(1), Duration::from_millis(100));
        assert_eq!(fetcher.backoff(2), Duration::from_millis(200));
        assert_eq!(fetcher.backoff(3), Duration::from_millis(400));
        assert_eq!(fetcher.backoff(10), Duration::from_millis(1_000));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.fetcher.timeout_seconds, 10);
        assert!(config.validation.required_phrases.is_empty());
    }

    #[test]
    fn test_skip_words_are_lowercase() {
        assert!(DEFAULT_SKIP_WORDS
            .iter()
            .all(|w| w.chars().all(|c| !c.is_ascii_uppercase())));
    }
}
