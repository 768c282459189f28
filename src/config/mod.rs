//! Configuration module for Tululu-Scraper
//!
//! Settings that rarely change between runs (the site, the category, the
//! reconnect policy, the log file) live in an optional TOML file. Everything
//! has a default, so running without a file crawls the science-fiction
//! category of tululu.org.
//!
//! # Example
//!
//! ```no_run
//! use tululu_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Category: {}", config.site.category_name);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, RetryConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash, parse_config, settings_fingerprint};
pub use validation::validate;
