use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::cli::{CheckArgs, Cli, ConfigAction};
use crate::config::{
    Config, FileConfigLoader, ProcessEnvironment, config_warnings, parse_config,
    validate_config_semantics,
};
use crate::fetcher::redact_url;
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result, UptakeGuardError};

use super::check::load_check_config;
use super::print_error;

#[must_use]
pub fn run_config(args: &crate::cli::ConfigArgs, cli: &Cli) -> i32 {
    match &args.action {
        ConfigAction::Validate { config } => run_config_validate(config),
        ConfigAction::Show { config, format } => run_config_show(config.as_deref(), format, cli),
    }
}

fn run_config_validate(config_path: &Path) -> i32 {
    match run_config_validate_impl(config_path) {
        Ok(warnings) => {
            for warning in &warnings {
                eprintln!("Warning: {warning}");
            }
            println!("Configuration is valid: {}", config_path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            print_error(&e);
            EXIT_CONFIG_ERROR
        }
    }
}

/// Validates a configuration file on top of the built-in defaults.
///
/// Returns the non-fatal warnings for the file.
///
/// # Errors
/// Returns an error if the file doesn't exist, contains invalid TOML, or has semantic errors.
pub fn run_config_validate_impl(config_path: &Path) -> Result<Vec<String>> {
    if !config_path.exists() {
        return Err(UptakeGuardError::Config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(config_path).map_err(|source| UptakeGuardError::FileRead {
        path: config_path.to_path_buf(),
        source,
    })?;
    let mut config = Config::default();
    config.apply(parse_config(&content)?);

    validate_config_semantics(&config)?;

    Ok(config_warnings(&config))
}

fn run_config_show(config_path: Option<&Path>, format: &str, cli: &Cli) -> i32 {
    match run_config_show_impl(config_path, format, cli.no_config) {
        Ok(output) => {
            print!("{output}");
            EXIT_SUCCESS
        }
        Err(e) => {
            print_error(&e);
            EXIT_CONFIG_ERROR
        }
    }
}

/// Shows the effective configuration (defaults, file and environment).
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or serialization fails.
pub fn run_config_show_impl(
    config_path: Option<&Path>,
    format: &str,
    no_config: bool,
) -> Result<String> {
    let args = CheckArgs {
        config: config_path.map(Path::to_path_buf),
        ..CheckArgs::default()
    };
    let config = load_check_config(
        &args,
        no_config,
        &FileConfigLoader::new(),
        &ProcessEnvironment,
    )?;

    render_config(&config, format)
}

/// Render a resolved configuration as `text` or `json`.
///
/// # Errors
/// Returns an error for an unknown format or if serialization fails.
pub fn render_config(config: &Config, format: &str) -> Result<String> {
    match format {
        "json" => {
            let mut config = config.clone();
            config.fetch.url = redact_url(&config.fetch.url);
            let json = serde_json::to_string_pretty(&config)?;
            Ok(format!("{json}\n"))
        }
        "text" => Ok(format_config_text(config)),
        _ => Err(UptakeGuardError::Config(format!(
            "Unknown format: {format}. Use 'text' or 'json'"
        ))),
    }
}

#[must_use]
pub fn format_config_text(config: &Config) -> String {
    let mut output = String::new();
    let policy = &config.policy;
    let fetch = &config.fetch;

    output.push_str("=== Effective Configuration ===\n\n");

    output.push_str("[policy]\n");
    let _ = writeln!(output, "  exclude_sources = {:?}", policy.exclude_sources);
    let _ = writeln!(output, "  good_statuses = {:?}", policy.good_statuses);
    let _ = writeln!(output, "  neutral_statuses = {:?}", policy.neutral_statuses);
    let _ = writeln!(output, "  min_total_entries = {}", policy.min_total_entries);
    let _ = writeln!(
        output,
        "  error_threshold_percent = {}",
        policy.error_threshold_percent
    );

    output.push_str("\n[fetch]\n");
    let _ = writeln!(output, "  url = \"{}\"", redact_url(&fetch.url));
    let _ = writeln!(
        output,
        "  api_key = {}",
        if fetch.api_key.is_some() { "<redacted>" } else { "<unset>" }
    );
    let _ = writeln!(output, "  timeout_secs = {}", fetch.timeout_secs);
    let _ = writeln!(output, "  retries = {}", fetch.retries);
    let _ = writeln!(output, "  backoff_factor_secs = {}", fetch.backoff_factor_secs);
    let _ = writeln!(output, "  retry_statuses = {:?}", fetch.retry_statuses);
    let _ = writeln!(output, "  cache = {}", fetch.cache);
    if fetch.cache {
        let _ = writeln!(output, "  cache_ttl_secs = {}", fetch.cache_ttl_secs);
    }

    if !policy.source_thresholds.is_empty() {
        output.push('\n');
        for (source, pct) in &policy.source_thresholds {
            let _ = writeln!(output, "[\"{source}\"]");
            let _ = writeln!(output, "  error_threshold_percent = {pct}");
        }
    }

    let warnings = config_warnings(config);
    if !warnings.is_empty() {
        output.push('\n');
        for warning in warnings {
            let _ = writeln!(output, "# warning: {warning}");
        }
    }

    output
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
