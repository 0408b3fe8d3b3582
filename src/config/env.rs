//! Environment variable overrides.
//!
//! Variable names are kept compatible with existing scheduled-job deployments.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Result, UptakeGuardError};

use super::model::{ConfigOverrides, FetchOverrides, SourceOverride};

pub const ENV_QUERY_URL: &str = "REDASH_API_QUERY_URL";
pub const ENV_API_KEY: &str = "REDASH_API_KEY";
pub const ENV_TIMEOUT_SECONDS: &str = "REDASH_TIMEOUT_SECONDS";
pub const ENV_EXCLUDE_SOURCES: &str = "EXCLUDE_SOURCES";
pub const ENV_GOOD_STATUSES: &str = "GOOD_STATUSES";
pub const ENV_NEUTRAL_STATUSES: &str = "NEUTRAL_STATUSES";
pub const ENV_MIN_TOTAL_ENTRIES: &str = "MIN_TOTAL_ENTRIES";
pub const ENV_DEFAULT_THRESHOLD: &str = "DEFAULT_ERROR_THRESHOLD_PERCENT";
pub const ENV_SPECIFIC_THRESHOLDS: &str = "SPECIFIC_ERROR_THRESHOLD_PERCENT";
pub const ENV_DEBUG: &str = "DEBUG";

/// Source of environment variables (for testability).
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Build an override layer from environment variables.
///
/// # Errors
/// Returns a configuration error if any variable is set but cannot be parsed.
pub fn overrides_from_env(env: &impl Environment) -> Result<ConfigOverrides> {
    let sources = match env.var(ENV_SPECIFIC_THRESHOLDS) {
        Some(raw) => parse_source_thresholds(&raw)?
            .into_iter()
            .map(|(source, pct)| {
                (
                    source,
                    SourceOverride {
                        error_threshold_percent: pct,
                    },
                )
            })
            .collect(),
        None => IndexMap::new(),
    };

    Ok(ConfigOverrides {
        exclude_sources: env.var(ENV_EXCLUDE_SOURCES).map(|v| parse_csv(&v)),
        extra_exclude_sources: Vec::new(),
        good_statuses: env.var(ENV_GOOD_STATUSES).map(|v| parse_csv(&v)),
        neutral_statuses: env.var(ENV_NEUTRAL_STATUSES).map(|v| parse_csv(&v)),
        min_total_entries: parse_var(env, ENV_MIN_TOTAL_ENTRIES)?,
        error_threshold_percent: parse_var(env, ENV_DEFAULT_THRESHOLD)?,
        fetch: FetchOverrides {
            url: env.var(ENV_QUERY_URL),
            api_key: env.var(ENV_API_KEY),
            timeout_secs: parse_var(env, ENV_TIMEOUT_SECONDS)?,
            cache: env.var(ENV_DEBUG).map(|v| parse_bool(ENV_DEBUG, &v)).transpose()?,
            ..FetchOverrides::default()
        },
        sources,
    })
}

/// Split a comma-separated list, trimming items and dropping empty ones.
#[must_use]
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse `name = pct; name = pct` pairs. Empty segments are ignored.
///
/// # Errors
/// Returns a configuration error for a segment without `=` or with a
/// non-numeric percentage.
pub fn parse_source_thresholds(raw: &str) -> Result<Vec<(String, f64)>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_source_threshold)
        .collect()
}

/// Parse a single `name=pct` pair.
///
/// # Errors
/// Returns a configuration error if the pair is malformed.
pub fn parse_source_threshold(pair: &str) -> Result<(String, f64)> {
    let Some((name, pct)) = pair.split_once('=') else {
        return Err(UptakeGuardError::Config(format!(
            "Invalid source threshold '{pair}'. Expected format: <source>=<percent>"
        )));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(UptakeGuardError::Config(format!(
            "Invalid source threshold '{pair}': source name is empty"
        )));
    }
    let pct = pct.trim().parse::<f64>().map_err(|_| {
        UptakeGuardError::Config(format!(
            "Invalid source threshold '{pair}': '{}' is not a number",
            pct.trim()
        ))
    })?;
    Ok((name.to_string(), pct))
}

fn parse_var<T: FromStr>(env: &impl Environment, key: &str) -> Result<Option<T>> {
    env.var(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                UptakeGuardError::Config(format!("Invalid value for {key}: '{raw}'"))
            })
        })
        .transpose()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" | "t" => Ok(true),
        "" | "0" | "false" | "no" | "n" | "off" | "f" => Ok(false),
        _ => Err(UptakeGuardError::Config(format!(
            "Invalid boolean for {key}: '{raw}'"
        ))),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
