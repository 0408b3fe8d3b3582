use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize, Serializer};

/// Query results endpoint used when nothing else is configured.
pub const DEFAULT_QUERY_URL: &str =
    "https://sql.telemetry.mozilla.org/api/queries/61352/results.json";

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "api_key";

const DEFAULT_EXCLUDE_SOURCES: &[&str] = &[
    "shield-recipe-client/*",
    "normandy/*",
    "main/url-classifier-skip-urls",
];
const DEFAULT_GOOD_STATUSES: &[&str] = &["success", "up_to_date"];
const DEFAULT_NEUTRAL_STATUSES: &[&str] = &["pref_disabled"];
const DEFAULT_SOURCE_THRESHOLDS: &[(&str, f64)] = &[("main/collection", 10.0), ("foo/bar", 2.0)];

const DEFAULT_MIN_TOTAL_ENTRIES: u64 = 1000;
const DEFAULT_ERROR_THRESHOLD_PERCENT: f64 = 2.0;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_FACTOR_SECS: f64 = 10.0;
const DEFAULT_RETRY_STATUSES: &[u16] = &[503, 504];
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// ============================================================================
// Resolved configuration
// ============================================================================

/// Classification policy for one evaluation run. Read-only once resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Policy {
    /// Glob patterns; matching sources are never classified.
    pub exclude_sources: Vec<String>,

    /// Statuses counted as good.
    pub good_statuses: IndexSet<String>,

    /// Statuses left out of the ratio entirely.
    pub neutral_statuses: IndexSet<String>,

    /// Sources with fewer good+bad samples than this are skipped.
    pub min_total_entries: u64,

    /// Threshold applied to sources without an override.
    pub error_threshold_percent: f64,

    /// Per-source threshold overrides, keyed by exact source identifier.
    pub source_thresholds: IndexMap<String, f64>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            exclude_sources: to_strings(DEFAULT_EXCLUDE_SOURCES).collect(),
            good_statuses: to_strings(DEFAULT_GOOD_STATUSES).collect(),
            neutral_statuses: to_strings(DEFAULT_NEUTRAL_STATUSES).collect(),
            min_total_entries: DEFAULT_MIN_TOTAL_ENTRIES,
            error_threshold_percent: DEFAULT_ERROR_THRESHOLD_PERCENT,
            source_thresholds: DEFAULT_SOURCE_THRESHOLDS
                .iter()
                .map(|(source, pct)| ((*source).to_string(), *pct))
                .collect(),
        }
    }
}

impl Policy {
    /// Threshold for `source`: its override if configured, else the default.
    #[must_use]
    pub fn threshold_for(&self, source: &str) -> f64 {
        self.source_thresholds
            .get(source)
            .copied()
            .unwrap_or(self.error_threshold_percent)
    }

    #[must_use]
    pub fn is_good(&self, status: &str) -> bool {
        self.good_statuses.contains(status)
    }

    #[must_use]
    pub fn is_neutral(&self, status: &str) -> bool {
        self.neutral_statuses.contains(status)
    }

    /// Statuses listed as both good and neutral, in good-list order.
    #[must_use]
    pub fn overlapping_statuses(&self) -> Vec<&str> {
        self.good_statuses
            .iter()
            .filter(|s| self.neutral_statuses.contains(s.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// How and where the report is retrieved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FetchSettings {
    pub url: String,

    #[serde(serialize_with = "serialize_secret")]
    pub api_key: Option<String>,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient failures.
    pub retries: u32,

    /// Base of the exponential backoff: retry `n` sleeps `factor * 2^(n-1)`
    /// seconds. The first retry does not sleep.
    pub backoff_factor_secs: f64,

    /// Server status codes treated as transient.
    pub retry_statuses: Vec<u16>,

    /// Keep successful responses in the user cache directory.
    pub cache: bool,

    pub cache_ttl_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_QUERY_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            backoff_factor_secs: DEFAULT_BACKOFF_FACTOR_SECS,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            cache: false,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Config {
    pub policy: Policy,
    pub fetch: FetchSettings,
}

impl Config {
    /// Apply one override layer on top of this configuration.
    ///
    /// Lists replace the current value, per-source thresholds are merged by
    /// name, and `extra_exclude_sources` is appended.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let policy = &mut self.policy;
        if let Some(patterns) = overrides.exclude_sources {
            policy.exclude_sources = patterns;
        }
        policy
            .exclude_sources
            .extend(overrides.extra_exclude_sources);
        if let Some(statuses) = overrides.good_statuses {
            policy.good_statuses = statuses.into_iter().collect();
        }
        if let Some(statuses) = overrides.neutral_statuses {
            policy.neutral_statuses = statuses.into_iter().collect();
        }
        if let Some(min) = overrides.min_total_entries {
            policy.min_total_entries = min;
        }
        if let Some(pct) = overrides.error_threshold_percent {
            policy.error_threshold_percent = pct;
        }
        for (source, source_override) in overrides.sources {
            policy
                .source_thresholds
                .insert(source, source_override.error_threshold_percent);
        }

        self.fetch.apply(overrides.fetch);
    }
}

impl FetchSettings {
    fn apply(&mut self, overrides: FetchOverrides) {
        if let Some(url) = overrides.url {
            self.url = url;
        }
        if let Some(key) = overrides.api_key {
            self.api_key = Some(key);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(retries) = overrides.retries {
            self.retries = retries;
        }
        if let Some(factor) = overrides.backoff_factor_secs {
            self.backoff_factor_secs = factor;
        }
        if let Some(statuses) = overrides.retry_statuses {
            self.retry_statuses = statuses;
        }
        if let Some(cache) = overrides.cache {
            self.cache = cache;
        }
        if let Some(ttl) = overrides.cache_ttl_secs {
            self.cache_ttl_secs = ttl;
        }
    }
}

// ============================================================================
// Override layers (config file, environment, CLI)
// ============================================================================

/// A partial configuration. Unset fields leave the lower layer untouched.
///
/// In a config file every top-level table other than `[fetch]` is a
/// per-source override, e.g. `["main/collection"]`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConfigOverrides {
    pub exclude_sources: Option<Vec<String>>,

    /// Appended to the exclusion list instead of replacing it (CLI `--exclude`).
    #[serde(skip)]
    pub extra_exclude_sources: Vec<String>,

    pub good_statuses: Option<Vec<String>>,
    pub neutral_statuses: Option<Vec<String>>,
    pub min_total_entries: Option<u64>,
    pub error_threshold_percent: Option<f64>,

    #[serde(default)]
    pub fetch: FetchOverrides,

    #[serde(flatten)]
    pub sources: IndexMap<String, SourceOverride>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FetchOverrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub backoff_factor_secs: Option<f64>,
    pub retry_statuses: Option<Vec<u16>>,
    pub cache: Option<bool>,
    pub cache_ttl_secs: Option<u64>,
}

/// Per-source table, e.g. `["main/collection"] error_threshold_percent = 10`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceOverride {
    pub error_threshold_percent: f64,
}

fn to_strings(items: &'static [&'static str]) -> impl Iterator<Item = String> {
    items.iter().map(|s| (*s).to_string())
}

#[allow(clippy::ref_option)]
fn serialize_secret<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_some("<redacted>"),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
