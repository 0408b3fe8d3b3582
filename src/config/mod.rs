mod env;
mod loader;
mod model;
mod validation;

pub use env::{
    Environment, ProcessEnvironment, overrides_from_env, parse_csv, parse_source_threshold,
    parse_source_thresholds,
};
pub use loader::{
    ConfigLoader, FileConfigLoader, FileSystem, LOCAL_CONFIG_NAME, LoadResult, RealFileSystem,
    parse_config, resolve_config,
};
pub use model::{
    API_KEY_PARAM, Config, ConfigOverrides, DEFAULT_QUERY_URL, FetchOverrides, FetchSettings,
    Policy, SourceOverride,
};
pub use validation::{config_warnings, log_config_warnings, validate_config_semantics};
