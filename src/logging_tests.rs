use super::*;

#[test]
fn default_level_follows_verbosity() {
    assert_eq!(default_level(0, false), "warn");
    assert_eq!(default_level(1, false), "info");
    assert_eq!(default_level(2, false), "debug");
    assert_eq!(default_level(5, false), "debug");
}

#[test]
fn quiet_wins_over_verbose() {
    assert_eq!(default_level(0, true), "error");
    assert_eq!(default_level(2, true), "error");
}

#[test]
fn init_logging_twice_is_harmless() {
    init_logging(0, false, ColorMode::Never);
    init_logging(2, false, ColorMode::Never);
}
