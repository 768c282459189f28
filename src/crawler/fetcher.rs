//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - Turning error statuses and redirects into typed failures
//! - Reconnecting on connection loss through the [`RetryPolicy`]
//!
//! The library site answers a request for a missing book by redirecting to
//! its home page, so the client never follows redirects: any redirect is
//! reported as [`FetchError::Redirected`] and treated as "does not exist".

use crate::config::{Config, HttpConfig, UserAgentConfig};
use crate::crawler::retry::RetryPolicy;
use reqwest::{header::LOCATION, redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a GET did not produce a usable response
#[derive(Debug, Error)]
pub enum FetchError {
    /// The connection could not be made or was lost; retried by the policy
    #[error("connection failed for {url}: {message}")]
    TransientNetwork { url: String, message: String },

    /// The server answered with an error status
    #[error("{url} returned HTTP {status}")]
    NotFound { url: String, status: u16 },

    /// The server redirected, which this site uses for missing resources
    #[error("{url} redirected to {location}")]
    Redirected { url: String, location: String },

    /// Any other request failure (invalid request, TLS setup, ...)
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    /// Headers arrived but the body could not be read
    #[error("failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Returns true for failures worth reconnecting for
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed and no timeout is set unless the config asks
/// for one.
///
/// # Example
///
/// ```no_run
/// use tululu_scraper::config::{HttpConfig, UserAgentConfig};
/// use tululu_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.header_value())
        .redirect(Policy::none()) // Redirects mean "not found" on this site
        .gzip(true)
        .brotli(true);

    if let Some(secs) = http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// HTTP client scoped to one crawl run
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Builds the client and retry policy described by the configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, &config.http)?;
        Ok(Self::new(client, config.retry.to_policy()))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Sends a GET and checks the answer
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | 4xx / 5xx | `NotFound` (never retried) |
    /// | 3xx | `Redirected` (never retried) |
    /// | Connect failure / timeout / dropped connection | retried, then `TransientNetwork` |
    /// | Other request failure | `Request` |
    pub async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        self.retry
            .run(url.as_str(), move || self.send_once(url))
            .await
    }

    /// GET and decode the body as text (charset from the Content-Type header)
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }

    /// GET and return the raw body
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    async fn send_once(&self, url: &Url) -> Result<Response, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        check_response(url, response)
    }
}

/// Splits reqwest errors into retryable and permanent ones
///
/// A connection refused, a timeout, or a connection dropped before the
/// response arrived (`is_request`) all mean the network went away, so they
/// are retried. Builder errors and the rest are permanent.
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_connect() || error.is_timeout() || (error.is_request() && !error.is_builder()) {
        FetchError::TransientNetwork {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Rejects error statuses and redirects
fn check_response(url: &Url, response: Response) -> Result<Response, FetchError> {
    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        return Err(FetchError::Redirected {
            url: url.to_string(),
            location,
        });
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::NotFound {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
