use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UptakeGuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to fetch {url}: {message}")]
    Transport {
        url: String,
        message: String,
        /// Connection failures and timeouts may succeed on a later attempt.
        retryable: bool,
    },

    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed report: {0}")]
    MalformedReport(String),
}

impl UptakeGuardError {
    /// Whether this error came from retrieving or decoding the report,
    /// as opposed to configuration or local I/O.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::MalformedReport(_)
        )
    }

    /// Raw response body attached to the error, if the server sent one.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UptakeGuardError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
