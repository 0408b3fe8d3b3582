use std::fs;

use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result, UptakeGuardError};

use super::print_error;

#[must_use]
pub fn run_init(args: &crate::cli::InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            print_error(&e);
            EXIT_CONFIG_ERROR
        }
    }
}

/// Initializes a new configuration file.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &crate::cli::InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(UptakeGuardError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

#[must_use]
pub fn generate_config_template() -> String {
    r#"# uptake-guard configuration file
#
# Precedence (lowest to highest): built-in defaults, this file,
# environment variables, command-line flags.

# Sources matching any of these glob patterns are never checked.
# `*` matches any run of characters, including `/`.
exclude_sources = [
    "shield-recipe-client/*",
    "normandy/*",
    "main/url-classifier-skip-urls",
]

# Statuses counted as good. Anything not good and not neutral is bad.
good_statuses = ["success", "up_to_date"]

# Statuses left out of the ratio entirely.
neutral_statuses = ["pref_disabled"]

# Sources with fewer good+bad samples than this are skipped.
min_total_entries = 1000

# A source is flagged when its bad percentage is strictly above this.
error_threshold_percent = 2.0

[fetch]
url = "https://sql.telemetry.mozilla.org/api/queries/61352/results.json"
# Prefer the REDASH_API_KEY environment variable over storing the key here.
# api_key = "..."
timeout_secs = 60
# Retries after the first attempt, for connection errors and retry_statuses.
retries = 3
# The first retry is immediate; retry n waits backoff_factor_secs * 2^(n-1)
# seconds, capped at 120.
backoff_factor_secs = 10.0
retry_statuses = [503, 504]
# Cache successful responses in the user cache directory.
cache = false
cache_ttl_secs = 300

# Per-source thresholds: one table per source identifier.
["main/collection"]
error_threshold_percent = 10.0

# ["blocklists/addons"]
# error_threshold_percent = 5.0
"#
    .to_string()
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
