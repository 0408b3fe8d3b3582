use std::time::Duration;

use tracing::{info, warn};

use crate::config::FetchSettings;
use crate::error::{Result, UptakeGuardError};

use super::url::redact_url;
use super::HttpClient;

/// Upper bound on a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Bounded retry with exponential backoff for transient fetch failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Retry `n` (1-based) sleeps `backoff_factor_secs * 2^(n-1)`, except
    /// the first retry which is immediate.
    pub backoff_factor_secs: f64,
    /// Server status codes treated as transient.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&FetchSettings::default())
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self {
            retries: settings.retries,
            backoff_factor_secs: settings.backoff_factor_secs,
            retry_statuses: settings.retry_statuses.clone(),
        }
    }

    /// Sleep before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.backoff_factor_secs * 2f64.powi(exponent);
        if !secs.is_finite() || secs >= MAX_BACKOFF.as_secs_f64() {
            return MAX_BACKOFF;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Whether a failed attempt may be retried.
    #[must_use]
    pub fn is_transient(&self, err: &UptakeGuardError) -> bool {
        match err {
            UptakeGuardError::Transport { retryable, .. } => *retryable,
            UptakeGuardError::HttpStatus { status, .. } => self.retry_statuses.contains(status),
            _ => false,
        }
    }
}

/// Blocking sleep between attempts (for testability).
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// GET `url`, retrying transient failures according to `policy`.
///
/// Non-2xx responses become [`UptakeGuardError::HttpStatus`] carrying the
/// response body. Permanent failures are returned without further attempts.
///
/// # Errors
/// Returns the last error once retries are exhausted, or the first
/// non-transient error.
pub fn get_with_retry(
    client: &impl HttpClient,
    sleeper: &impl Sleeper,
    policy: &RetryPolicy,
    url: &str,
) -> Result<String> {
    let display_url = redact_url(url);
    let mut retry = 0;
    loop {
        info!(url = %display_url, attempt = retry + 1, "fetching report");
        let err = match client.get(url) {
            Ok(response) if response.is_success() => return Ok(response.body),
            Ok(response) => UptakeGuardError::HttpStatus {
                url: display_url.clone(),
                status: response.status,
                body: response.body,
            },
            Err(e) => e,
        };

        if retry >= policy.retries || !policy.is_transient(&err) {
            return Err(err);
        }
        retry += 1;
        let delay = policy.delay_for_retry(retry);
        warn!(
            retry,
            of = policy.retries,
            delay_secs = delay.as_secs_f64(),
            "transient failure, retrying: {err}"
        );
        sleeper.sleep(delay);
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
