mod cache;
mod report;
mod retry;
mod url;

pub use cache::ResponseCache;
pub use report::{SOURCE_FIELD, SourceRow, parse_report};
pub use retry::{MAX_BACKOFF, RetryPolicy, Sleeper, ThreadSleeper, get_with_retry};
pub use url::{authenticated_url, is_remote_url, redact_url};

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::config::FetchSettings;
use crate::error::{Result, UptakeGuardError};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP client abstraction for dependency injection.
pub trait HttpClient {
    /// Perform a GET request.
    ///
    /// Any status code is returned as a response; only transport-level
    /// failures are errors.
    ///
    /// # Errors
    /// Returns [`UptakeGuardError::Transport`] if no response was received.
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Production HTTP client using reqwest.
///
/// This implementation cannot be unit tested without a real HTTP server,
/// so it is excluded from coverage measurement.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("uptake-guard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UptakeGuardError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(not(tarpaulin_include))]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let transport_error = |e: reqwest::Error| {
            let retryable = e.is_timeout() || e.is_connect() || e.is_body();
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e.without_url())
            } else {
                e.without_url().to_string()
            };
            UptakeGuardError::Transport {
                url: redact_url(url),
                message,
                retryable,
            }
        };

        let response = self.client.get(url).send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        Ok(HttpResponse { status, body })
    }
}

/// Anything that can produce the rows of one report.
pub trait ReportSource {
    /// Retrieve and decode the report.
    ///
    /// # Errors
    /// Returns a fetch error if the report cannot be retrieved or decoded.
    fn fetch(&self) -> Result<Vec<SourceRow>>;
}

/// Downloads the report from the query API.
#[derive(Debug)]
pub struct ReportFetcher<C: HttpClient = ReqwestClient, S: Sleeper = ThreadSleeper> {
    client: C,
    sleeper: S,
    url: String,
    retry: RetryPolicy,
    cache: Option<ResponseCache>,
}

impl ReportFetcher<ReqwestClient, ThreadSleeper> {
    /// Production fetcher for the given settings.
    ///
    /// # Errors
    /// Returns a configuration error if the URL or API key is unusable, or
    /// the HTTP client cannot be built.
    pub fn from_settings(settings: &FetchSettings) -> Result<Self> {
        let client = ReqwestClient::new(Duration::from_secs(settings.timeout_secs))?;
        let fetcher = Self::new(client, ThreadSleeper, settings)?;

        let cache = if settings.cache {
            let cache = ResponseCache::in_user_cache_dir(Duration::from_secs(settings.cache_ttl_secs));
            if let Some(cache) = &cache {
                warn!(
                    dir = %cache.dir().display(),
                    ttl_secs = settings.cache_ttl_secs,
                    "response caching is enabled; results may be stale"
                );
            }
            cache
        } else {
            None
        };
        Ok(fetcher.with_cache(cache))
    }
}

impl<C: HttpClient, S: Sleeper> ReportFetcher<C, S> {
    /// # Errors
    /// Returns a configuration error if the URL or API key is unusable.
    pub fn new(client: C, sleeper: S, settings: &FetchSettings) -> Result<Self> {
        Ok(Self {
            client,
            sleeper,
            url: authenticated_url(&settings.url, settings.api_key.as_deref())?,
            retry: RetryPolicy::from_settings(settings),
            cache: None,
        })
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Option<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Raw report body, from the cache when fresh, otherwise over HTTP.
    ///
    /// # Errors
    /// Returns a fetch error once retries are exhausted or on a permanent failure.
    pub fn download(&self) -> Result<String> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.read(&self.url)) {
            return Ok(body);
        }

        let body = get_with_retry(&self.client, &self.sleeper, &self.retry, &self.url)?;

        if let Some(cache) = &self.cache {
            let _ = cache.write(&self.url, &body);
        }
        Ok(body)
    }
}

impl<C: HttpClient, S: Sleeper> ReportSource for ReportFetcher<C, S> {
    fn fetch(&self) -> Result<Vec<SourceRow>> {
        parse_report(&self.download()?)
    }
}

/// Reads a previously saved report from disk.
#[derive(Debug, Clone)]
pub struct ReportFile {
    path: PathBuf,
}

impl ReportFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for ReportFile {
    fn fetch(&self) -> Result<Vec<SourceRow>> {
        let body =
            std::fs::read_to_string(&self.path).map_err(|source| UptakeGuardError::FileRead {
                path: self.path.clone(),
                source,
            })?;
        parse_report(&body)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
