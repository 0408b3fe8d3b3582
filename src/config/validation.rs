//! Configuration semantic validation.
//!
//! Runs after all layers are merged and before any fetch, so a bad value
//! aborts the run without partially applying anything.

use tracing::warn;

use crate::checker::compile_source_glob;
use crate::config::{Config, FetchSettings, Policy};
use crate::{Result, UptakeGuardError};

/// Validates semantic correctness of a resolved configuration.
///
/// # Errors
/// Returns an error if a threshold is negative or not finite, an exclusion
/// glob does not compile, or fetch settings are out of range.
pub fn validate_config_semantics(config: &Config) -> Result<()> {
    validate_policy(&config.policy)?;
    validate_glob_patterns(&config.policy)?;
    validate_fetch(&config.fetch)?;
    Ok(())
}

/// Non-fatal findings about a configuration, one message per problem.
#[must_use]
pub fn config_warnings(config: &Config) -> Vec<String> {
    config
        .policy
        .overlapping_statuses()
        .into_iter()
        .map(|status| {
            format!("status '{status}' is listed as both good and neutral; it will be counted as good")
        })
        .collect()
}

/// Log every entry of [`config_warnings`].
pub fn log_config_warnings(config: &Config) {
    for message in config_warnings(config) {
        warn!("{message}");
    }
}

fn validate_policy(policy: &Policy) -> Result<()> {
    check_threshold("error_threshold_percent", policy.error_threshold_percent)?;
    for (source, pct) in &policy.source_thresholds {
        check_threshold(&format!("[\"{source}\"].error_threshold_percent"), *pct)?;
    }
    Ok(())
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(UptakeGuardError::Config(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn validate_glob_patterns(policy: &Policy) -> Result<()> {
    for pattern in &policy.exclude_sources {
        compile_source_glob(pattern)?;
    }
    Ok(())
}

fn validate_fetch(fetch: &FetchSettings) -> Result<()> {
    if fetch.url.trim().is_empty() {
        return Err(UptakeGuardError::Config(
            "fetch.url must not be empty".to_string(),
        ));
    }
    if fetch.timeout_secs == 0 {
        return Err(UptakeGuardError::Config(
            "fetch.timeout_secs must be greater than 0".to_string(),
        ));
    }
    if !fetch.backoff_factor_secs.is_finite() || fetch.backoff_factor_secs < 0.0 {
        return Err(UptakeGuardError::Config(format!(
            "fetch.backoff_factor_secs must be a non-negative number, got {}",
            fetch.backoff_factor_secs
        )));
    }
    if let Some(status) = fetch
        .retry_statuses
        .iter()
        .find(|s| !(100..=599).contains(*s))
    {
        return Err(UptakeGuardError::Config(format!(
            "fetch.retry_statuses contains invalid HTTP status {status}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
