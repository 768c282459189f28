//! Tululu-Scraper: a book-catalog crawler
//!
//! This crate walks the paginated catalog of an online library, parses each
//! book page for its metadata, downloads the book text and cover image, and
//! writes the collected records as one JSON document per run.

pub mod args;
pub mod config;
pub mod crawler;
pub mod logging;
pub mod output;
pub mod record;
pub mod url;

use thiserror::Error;

/// Main error type for Tululu-Scraper operations
///
/// Per-book failures never surface here: the coordinator logs and skips them.
/// Only errors that abort a whole run end up as a `ScraperError`.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Tululu-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use args::ConsoleArgs;
pub use config::Config;
pub use record::BookRecord;
