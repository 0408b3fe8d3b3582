use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::checker::{Evaluation, UptakeChecker, evaluate};
use crate::cli::{CheckArgs, Cli};
use crate::config::{
    Config, ConfigLoader, ConfigOverrides, Environment, FetchOverrides, FileConfigLoader,
    ProcessEnvironment, SourceOverride, overrides_from_env, resolve_config,
};
use crate::fetcher::{ReportFetcher, ReportFile, ReportSource, SourceRow};
use crate::output::{ColorMode, JsonFormatter, OutputFormat, OutputFormatter, TextFormatter};
use crate::{EXIT_SUCCESS, EXIT_THRESHOLD_EXCEEDED, Result, exit_code_for};

use super::{color_choice_to_mode, print_error};

#[must_use]
pub fn run_check(args: &CheckArgs, cli: &Cli) -> i32 {
    match run_check_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            print_error(&e);
            exit_code_for(&e)
        }
    }
}

/// Runs one check: resolve configuration, fetch the report, evaluate it and
/// print the outcome.
///
/// # Errors
/// Returns a configuration error for unusable settings, or a fetch error if
/// the report cannot be retrieved or decoded.
pub fn run_check_impl(args: &CheckArgs, cli: &Cli) -> Result<i32> {
    // 1. Resolve configuration: defaults < file < environment < CLI
    let config = load_check_config(
        args,
        cli.no_config,
        &FileConfigLoader::new(),
        &ProcessEnvironment,
    )?;

    // 2. Compile the policy before any network traffic
    let checker = UptakeChecker::new(config.policy.clone())?;

    // 3. Fetch the report
    let rows = fetch_rows(args, &config)?;
    info!(rows = rows.len(), "report loaded");

    // 4. Evaluate and report
    let evaluation = evaluate(&checker, &rows);
    let color_mode = color_choice_to_mode(cli.color);
    let output = format_output(args.format, &evaluation, color_mode, cli.verbose, cli.quiet)?;
    write_output(args.output.as_deref(), &output)?;

    if args.dry_run && !evaluation.is_success() {
        warn!(
            flagged = evaluation.flagged_count(),
            "dry run: exiting successfully despite flagged sources"
        );
    }
    Ok(exit_code(&evaluation, args.dry_run))
}

/// Merge every configuration layer for a check run.
///
/// # Errors
/// Returns an error if a layer cannot be read or the merged result is invalid.
pub fn load_check_config(
    args: &CheckArgs,
    no_config: bool,
    loader: &impl ConfigLoader,
    env: &impl Environment,
) -> Result<Config> {
    let file_layer = if no_config {
        ConfigOverrides::default()
    } else {
        let loaded = match &args.config {
            Some(path) => loader.load_from_path(path)?,
            None => loader.load()?,
        };
        if let Some(path) = &loaded.path {
            info!(path = %path.display(), "using configuration file");
        }
        loaded.overrides
    };

    resolve_config([file_layer, overrides_from_env(env)?, cli_overrides(args)])
}

/// The override layer contributed by command-line flags.
#[must_use]
pub fn cli_overrides(args: &CheckArgs) -> ConfigOverrides {
    ConfigOverrides {
        extra_exclude_sources: args.exclude.clone(),
        min_total_entries: args.min_total_entries,
        error_threshold_percent: args.threshold,
        fetch: FetchOverrides {
            url: args.url.clone(),
            cache: args.cache.then_some(true),
            ..FetchOverrides::default()
        },
        sources: args
            .source_thresholds
            .iter()
            .map(|(source, pct)| {
                (
                    source.clone(),
                    SourceOverride {
                        error_threshold_percent: *pct,
                    },
                )
            })
            .collect(),
        ..ConfigOverrides::default()
    }
}

fn fetch_rows(args: &CheckArgs, config: &Config) -> Result<Vec<SourceRow>> {
    if let Some(path) = &args.report_file {
        let file = ReportFile::new(path);
        debug!(path = %file.path().display(), "reading report from file");
        return file.fetch();
    }
    ReportFetcher::from_settings(&config.fetch)?.fetch()
}

pub(crate) fn format_output(
    format: OutputFormat,
    evaluation: &Evaluation,
    color_mode: ColorMode,
    verbose: u8,
    quiet: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => TextFormatter::with_verbose(color_mode, verbose)
            .with_quiet(quiet)
            .format(evaluation),
        OutputFormat::Json => JsonFormatter.format(evaluation),
    }
}

pub(crate) fn write_output(output_path: Option<&Path>, content: &str) -> Result<()> {
    if let Some(path) = output_path {
        fs::write(path, content)?;
    } else {
        print!("{content}");
    }
    Ok(())
}

/// Flagged sources fail the run unless it is a dry run.
#[must_use]
pub fn exit_code(evaluation: &Evaluation, dry_run: bool) -> i32 {
    if evaluation.is_success() || dry_run {
        EXIT_SUCCESS
    } else {
        EXIT_THRESHOLD_EXCEEDED
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
