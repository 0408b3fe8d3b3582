use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::parse_source_threshold;
use crate::output::OutputFormat;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "uptake-guard")]
#[command(author, version, about = "Flag data-collection sources whose bad-status ratio exceeds a threshold")]
#[command(long_about = "Downloads an uptake report, classifies each source's status counts \
    as good, bad or neutral, and flags sources whose bad ratio is over threshold.\n\n\
    Exit codes:\n  \
    0 - No source flagged (or --dry-run)\n  \
    1 - One or more sources over threshold\n  \
    2 - Configuration or runtime error\n  \
    3 - Report could not be fetched or decoded")]
pub struct Cli {
    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Skip loading configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the report and check every source against its threshold
    Check(CheckArgs),

    /// Generate a default configuration file
    Init(InitArgs),

    /// Configuration file utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Query results URL (overrides config and REDASH_API_QUERY_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Read the report from a local JSON file instead of fetching it
    #[arg(long, conflicts_with = "url")]
    pub report_file: Option<PathBuf>,

    /// Default bad-ratio threshold in percent
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Per-source threshold, e.g. `main/collection=10` (repeatable)
    #[arg(long = "source-threshold", value_name = "SOURCE=PERCENT", value_parser = parse_source_threshold)]
    pub source_thresholds: Vec<(String, f64)>,

    /// Minimum good+bad samples for a source to be checked
    #[arg(long)]
    pub min_total_entries: Option<u64>,

    /// Additional source exclusion patterns (glob syntax, can be specified multiple times)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Cache successful responses in the user cache directory
    #[arg(long)]
    pub cache: bool,

    /// Report flagged sources but always exit 0
    #[arg(short, long)]
    pub dry_run: bool,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long, default_value = ".uptake-guard.toml")]
    pub output: PathBuf,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate configuration file syntax and values
    Validate {
        /// Path to configuration file (default: .uptake-guard.toml)
        #[arg(short, long, default_value = ".uptake-guard.toml")]
        config: PathBuf,
    },

    /// Display the effective configuration (merged from all sources)
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format [possible values: text, json]
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
