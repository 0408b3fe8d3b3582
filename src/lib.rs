pub mod checker;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod output;

pub use error::{Result, UptakeGuardError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_THRESHOLD_EXCEEDED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_FETCH_ERROR: i32 = 3;

/// Map an error to the process exit code reported to the scheduler.
#[must_use]
pub const fn exit_code_for(err: &UptakeGuardError) -> i32 {
    if err.is_fetch_error() {
        EXIT_FETCH_ERROR
    } else {
        EXIT_CONFIG_ERROR
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
