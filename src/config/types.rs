use crate::crawler::RetryPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Tululu-Scraper
///
/// Every table is optional; an absent config file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Where and what to crawl
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the library site; book and asset links resolve against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Category listing path relative to the base URL (e.g. "l55/")
    #[serde(rename = "category-path")]
    pub category_path: String,

    /// Human-readable category name, used for the default JSON file name
    #[serde(rename = "category-name")]
    pub category_name: String,

    /// Exact text of the "download as text" link on a book page
    #[serde(rename = "download-link-text")]
    pub download_link_text: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tululu.org/".to_string(),
            category_path: "l55/".to_string(),
            category_name: "Научная фантастика".to_string(),
            download_link_text: "скачать txt".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Tululu-Scraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL)
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Reconnect behaviour on connection loss
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// First wait after a connection failure (milliseconds)
    #[serde(rename = "initial-delay-ms")]
    pub initial_delay_ms: u64,

    /// Upper bound for a single wait (milliseconds); unset means no cap
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: Option<u64>,

    /// Total attempts per request; unset means retry until the connection is back
    #[serde(rename = "max-attempts")]
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 100,
            max_delay_ms: Some(60_000),
            max_attempts: None,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: self.max_delay_ms.map(Duration::from_millis),
            max_attempts: self.max_attempts,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds; unset means requests may hang forever
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only progress log
    #[serde(rename = "log-path")]
    pub log_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("information.log"),
        }
    }
}
