use std::path::PathBuf;

use clap::CommandFactory;

use super::*;

fn check_args(args: &[&str]) -> CheckArgs {
    let argv = ["uptake-guard", "check"].into_iter().chain(args.iter().copied());
    match Cli::parse_from(argv).command {
        Commands::Check(args) => args,
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn cli_check_defaults() {
    let args = check_args(&[]);
    assert_eq!(args.config, None);
    assert_eq!(args.url, None);
    assert_eq!(args.threshold, None);
    assert!(args.source_thresholds.is_empty());
    assert!(args.exclude.is_empty());
    assert!(!args.cache);
    assert!(!args.dry_run);
    assert_eq!(args.format, OutputFormat::Text);
}

#[test]
fn cli_check_with_config() {
    let args = check_args(&["--config", "custom.toml"]);
    assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
}

#[test]
fn cli_check_policy_flags() {
    let args = check_args(&[
        "--threshold",
        "5.5",
        "--min-total-entries",
        "200",
        "-x",
        "main/*",
        "--exclude",
        "blocklists/*",
    ]);
    assert_eq!(args.threshold, Some(5.5));
    assert_eq!(args.min_total_entries, Some(200));
    assert_eq!(args.exclude, vec!["main/*", "blocklists/*"]);
}

#[test]
fn cli_check_source_thresholds() {
    let args = check_args(&[
        "--source-threshold",
        "main/collection=10",
        "--source-threshold",
        " foo/bar = 2.5 ",
    ]);
    assert_eq!(
        args.source_thresholds,
        vec![
            ("main/collection".to_string(), 10.0),
            ("foo/bar".to_string(), 2.5)
        ]
    );
}

#[test]
fn cli_check_rejects_bad_source_threshold() {
    let result = Cli::try_parse_from(["uptake-guard", "check", "--source-threshold", "nope"]);
    assert!(result.is_err());
}

#[test]
fn cli_check_report_file_conflicts_with_url() {
    let result = Cli::try_parse_from([
        "uptake-guard",
        "check",
        "--url",
        "https://example.com/r.json",
        "--report-file",
        "r.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn cli_check_output_flags() {
    let args = check_args(&["--format", "json", "--output", "out.json", "--dry-run", "--cache"]);
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.output, Some(PathBuf::from("out.json")));
    assert!(args.dry_run);
    assert!(args.cache);
}

#[test]
fn cli_check_rejects_unknown_format() {
    let result = Cli::try_parse_from(["uptake-guard", "check", "--format", "sarif"]);
    assert!(result.is_err());
}

#[test]
fn cli_global_flags() {
    let cli = Cli::parse_from([
        "uptake-guard",
        "check",
        "-vv",
        "--color",
        "never",
        "--no-config",
    ]);
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.color, ColorChoice::Never));
    assert!(cli.no_config);
    assert!(!cli.quiet);
}

#[test]
fn cli_init_defaults() {
    let cli = Cli::parse_from(["uptake-guard", "init"]);
    match cli.command {
        Commands::Init(args) => {
            assert_eq!(args.output, PathBuf::from(".uptake-guard.toml"));
            assert!(!args.force);
        }
        _ => panic!("Expected Init command"),
    }
}

#[test]
fn cli_config_show() {
    let cli = Cli::parse_from(["uptake-guard", "config", "show", "--format", "json"]);
    match cli.command {
        Commands::Config(ConfigArgs {
            action: ConfigAction::Show { config, format },
        }) => {
            assert_eq!(config, None);
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Config Show command"),
    }
}

#[test]
fn cli_config_validate_default_path() {
    let cli = Cli::parse_from(["uptake-guard", "config", "validate"]);
    match cli.command {
        Commands::Config(ConfigArgs {
            action: ConfigAction::Validate { config },
        }) => assert_eq!(config, PathBuf::from(".uptake-guard.toml")),
        _ => panic!("Expected Config Validate command"),
    }
}
