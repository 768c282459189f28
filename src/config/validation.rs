use crate::config::types::{Config, HttpConfig, OutputConfig, RetryConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_retry_config(&config.retry)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    if config.category_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "category_path cannot be empty".to_string(),
        ));
    }

    if config.category_path.contains("://") {
        return Err(ConfigError::Validation(format!(
            "category_path must be relative to base_url, got '{}'",
            config.category_path
        )));
    }

    // Becomes a file name when no custom JSON path is given
    if config.category_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "category_name cannot be empty".to_string(),
        ));
    }

    if config.category_name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "category_name must not contain path separators, got '{}'",
            config.category_name
        )));
    }

    if config.download_link_text.trim().is_empty() {
        return Err(ConfigError::Validation(
            "download_link_text cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates the reconnect settings
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.initial_delay_ms == 0 {
        return Err(ConfigError::Validation(
            "initial_delay_ms must be >= 1".to_string(),
        ));
    }

    if let Some(max_delay) = config.max_delay_ms {
        if max_delay < config.initial_delay_ms {
            return Err(ConfigError::Validation(format!(
                "max_delay_ms ({}) must be >= initial_delay_ms ({})",
                max_delay, config.initial_delay_ms
            )));
        }
    }

    if config.max_attempts == Some(0) {
        return Err(ConfigError::Validation(
            "max_attempts must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.log_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
