pub mod check;
pub mod config;
pub mod init;

pub use check::{cli_overrides, exit_code, load_check_config, run_check, run_check_impl};
pub use config::{
    format_config_text, render_config, run_config, run_config_show_impl,
    run_config_validate_impl,
};
pub use init::{generate_config_template, run_init, run_init_impl};

use crate::UptakeGuardError;
use crate::cli::ColorChoice;
use crate::output::ColorMode;

#[must_use]
pub const fn color_choice_to_mode(choice: ColorChoice) -> ColorMode {
    match choice {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    }
}

/// Print an error to stderr, followed by the server's response body if any.
pub fn print_error(err: &UptakeGuardError) {
    eprintln!("Error: {err}");
    if let Some(body) = err.response_body() {
        eprintln!("{body}");
    }
}
