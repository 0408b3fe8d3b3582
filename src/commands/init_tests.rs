use crate::cli::InitArgs;
use crate::config::{Config, parse_config};
use tempfile::TempDir;

use super::{generate_config_template, run_init, run_init_impl};
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};

#[test]
fn generate_config_template_is_valid_config() {
    let overrides = parse_config(&generate_config_template()).unwrap();
    assert_eq!(overrides.min_total_entries, Some(1000));
    assert_eq!(overrides.fetch.retries, Some(3));
    assert_eq!(overrides.fetch.api_key, None);
    assert!(overrides.sources.contains_key("main/collection"));
}

#[test]
fn generate_config_template_matches_defaults() {
    let mut config = Config::default();
    let defaults = config.clone();
    config.apply(parse_config(&generate_config_template()).unwrap());
    assert_eq!(config, defaults);
}

#[test]
fn run_init_creates_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".uptake-guard.toml");

    let args = InitArgs {
        output: config_path.clone(),
        force: false,
    };

    run_init_impl(&args).unwrap();

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("uptake-guard configuration file"));
}

#[test]
fn run_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".uptake-guard.toml");
    std::fs::write(&config_path, "# existing").unwrap();

    let args = InitArgs {
        output: config_path.clone(),
        force: false,
    };

    assert_eq!(run_init(&args), EXIT_CONFIG_ERROR);
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "# existing");
}

#[test]
fn run_init_force_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".uptake-guard.toml");
    std::fs::write(&config_path, "# existing").unwrap();

    let args = InitArgs {
        output: config_path.clone(),
        force: true,
    };

    assert_eq!(run_init(&args), EXIT_SUCCESS);
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("error_threshold_percent = 2.0"));
}
