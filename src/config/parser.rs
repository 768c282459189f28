use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a scraper settings file
///
/// The file is TOML; missing tables and keys fall back to the built-in
/// tululu.org defaults. The result is validated before it is returned.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tululu_scraper::config::load_config;
///
/// let config = load_config(Path::new("scraper.toml")).unwrap();
/// println!("Crawling category: {}", config.site.category_name);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates settings from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of the settings text
///
/// Written to the crawl log so a run can be traced back to the exact file
/// it was started with.
pub fn settings_fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Reads a settings file once, returning the parsed settings and the
/// fingerprint of the text they were parsed from
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, settings_fingerprint(&content)))
}
