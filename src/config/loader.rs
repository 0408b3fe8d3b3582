use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, UptakeGuardError};

use super::Config;
use super::model::ConfigOverrides;
use super::validation::{log_config_warnings, validate_config_semantics};

/// Result of loading a configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResult {
    /// The override layer read from the file (empty when no file was found).
    pub overrides: ConfigOverrides,
    /// Path the layer was read from, if any.
    pub path: Option<PathBuf>,
}

/// Trait for loading the config-file layer.
pub trait ConfigLoader {
    /// Load from the default search locations.
    ///
    /// # Errors
    /// Returns an error if a discovered file cannot be read or parsed.
    fn load(&self) -> Result<LoadResult>;

    /// Load from a specific path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn load_from_path(&self, path: &Path) -> Result<LoadResult>;
}

pub const LOCAL_CONFIG_NAME: &str = ".uptake-guard.toml";
const USER_CONFIG_NAME: &str = "config.toml";

/// Trait for filesystem operations (for testability).
pub trait FileSystem {
    /// Read file contents as a string.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Get the current working directory.
    ///
    /// # Errors
    /// Returns an error if the current directory cannot be determined.
    fn current_dir(&self) -> std::io::Result<PathBuf>;

    /// Platform-specific configuration directory for uptake-guard.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "uptake-guard")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

/// Loads the config-file layer from the filesystem.
///
/// Search order:
/// 1. `.uptake-guard.toml` in the current directory
/// 2. `config.toml` in the platform user config directory
///    (e.g. `~/.config/uptake-guard/config.toml` on Linux)
/// 3. An empty layer if neither exists
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    fn local_config_path(&self) -> Option<PathBuf> {
        self.fs
            .current_dir()
            .ok()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.fs.config_dir().map(|dir| dir.join(USER_CONFIG_NAME))
    }

    fn read_file(&self, path: &Path) -> Result<LoadResult> {
        let content =
            self.fs
                .read_to_string(path)
                .map_err(|source| UptakeGuardError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })?;
        let overrides = parse_config(&content)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(LoadResult {
            overrides,
            path: Some(path.to_path_buf()),
        })
    }
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<LoadResult> {
        let candidates = [self.local_config_path(), self.user_config_path()];
        for path in candidates.into_iter().flatten() {
            if self.fs.exists(&path) {
                return self.read_file(&path);
            }
        }
        Ok(LoadResult::default())
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        self.read_file(path)
    }
}

/// Parse a config file's contents into an override layer.
///
/// # Errors
/// Returns an error if the TOML is invalid or a value has the wrong type.
pub fn parse_config(content: &str) -> Result<ConfigOverrides> {
    toml::from_str(content).map_err(UptakeGuardError::from)
}

/// Apply override layers (lowest precedence first) to the built-in defaults
/// and validate the result.
///
/// # Errors
/// Returns a configuration error if the merged configuration is invalid.
pub fn resolve_config(layers: impl IntoIterator<Item = ConfigOverrides>) -> Result<Config> {
    let mut config = Config::default();
    for layer in layers {
        config.apply(layer);
    }
    validate_config_semantics(&config)?;
    log_config_warnings(&config);
    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
