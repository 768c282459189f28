//! Reconnect policy for lost connections
//!
//! Only connection-level failures are retried. HTTP status errors and
//! redirects are answers from the server and go straight back to the caller.

use crate::crawler::fetcher::FetchError;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff for transient network failures
///
/// The wait before retry `n` (0-based) is `initial_delay * 2^n`, clamped to
/// `max_delay` when one is set. With `max_attempts` unset the request is
/// retried for as long as the connection stays down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Option<Duration>,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Some(Duration::from_secs(60)),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Wait before the given retry (0 = first retry)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(retry));

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or attempts run out
    ///
    /// # Arguments
    ///
    /// * `url` - Used for log messages only
    /// * `operation` - Produces a fresh request future for every attempt
    pub async fn run<T, F, Fut>(&self, url: &str, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempts: u32 = 0;

        loop {
            let error = match operation().await {
                Err(error) if error.is_transient() => error,
                other => return other,
            };

            attempts = attempts.saturating_add(1);

            if let Some(max_attempts) = self.max_attempts {
                if attempts >= max_attempts {
                    tracing::warn!("Giving up on {} after {} attempts: {}", url, attempts, error);
                    return Err(error);
                }
            }

            let delay = self.delay_for(attempts - 1);
            tracing::warn!(
                "Connection lost ({}). Retrying {} in {:.1}s",
                error,
                url,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
        }
    }
}
