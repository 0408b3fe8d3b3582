use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate_config_semantics(&Config::default()).is_ok());
}

#[test]
fn rejects_negative_default_threshold() {
    let mut config = Config::default();
    config.policy.error_threshold_percent = -1.0;
    let err = validate_config_semantics(&config).unwrap_err();
    assert!(err.to_string().contains("error_threshold_percent"));
}

#[test]
fn rejects_nan_source_threshold() {
    let mut config = Config::default();
    config
        .policy
        .source_thresholds
        .insert("main/collection".to_string(), f64::NAN);
    let err = validate_config_semantics(&config).unwrap_err();
    assert!(err.to_string().contains("main/collection"));
}

#[test]
fn accepts_thresholds_above_one_hundred() {
    // Effectively disables alerting for that source.
    let mut config = Config::default();
    config
        .policy
        .source_thresholds
        .insert("main/noisy".to_string(), 150.0);
    assert!(validate_config_semantics(&config).is_ok());
}

#[test]
fn rejects_invalid_glob() {
    let mut config = Config::default();
    config.policy.exclude_sources.push("main/[abc".to_string());
    let err = validate_config_semantics(&config).unwrap_err();
    assert!(
        matches!(err, UptakeGuardError::InvalidPattern { ref pattern, .. } if pattern == "main/[abc")
    );
}

#[test]
fn accepts_literal_braces_like_matcher() {
    let mut config = Config::default();
    config.policy.exclude_sources.push("main/{a".to_string());
    config.policy.exclude_sources.push("main/}b{".to_string());
    assert!(validate_config_semantics(&config).is_ok());
}

#[test]
fn rejects_zero_timeout() {
    let mut config = Config::default();
    config.fetch.timeout_secs = 0;
    assert!(validate_config_semantics(&config).is_err());
}

#[test]
fn rejects_empty_url() {
    let mut config = Config::default();
    config.fetch.url = "  ".to_string();
    assert!(validate_config_semantics(&config).is_err());
}

#[test]
fn rejects_out_of_range_retry_status() {
    let mut config = Config::default();
    config.fetch.retry_statuses = vec![503, 999];
    let err = validate_config_semantics(&config).unwrap_err();
    assert!(err.to_string().contains("999"));
}

#[test]
fn rejects_negative_backoff() {
    let mut config = Config::default();
    config.fetch.backoff_factor_secs = -0.5;
    assert!(validate_config_semantics(&config).is_err());
}

#[test]
fn overlap_is_a_warning_not_an_error() {
    let mut config = Config::default();
    config.policy.neutral_statuses.insert("success".to_string());

    assert!(validate_config_semantics(&config).is_ok());
    let warnings = config_warnings(&config);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("'success'"));
}

#[test]
fn no_warnings_for_defaults() {
    assert!(config_warnings(&Config::default()).is_empty());
}
