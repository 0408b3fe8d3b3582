use std::io::Write;

use crate::checker::{CheckResult, Classification, Evaluation};
use crate::error::Result;

use super::OutputFormatter;

const SOURCE_WIDTH: usize = 40;
const STATS_WIDTH: usize = 40;
const STATUS_WIDTH: usize = 20;
const COUNT_WIDTH: usize = 10;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// ANSI color codes
mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

pub struct TextFormatter {
    use_colors: bool,
    verbose: u8,
    quiet: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self::with_verbose(mode, 0)
    }

    #[must_use]
    pub fn with_verbose(mode: ColorMode, verbose: u8) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
            verbose,
            quiet: false,
        }
    }

    /// Only print the failure block.
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                // Respect NO_COLOR environment variable
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        format!("{color}{text}{}", ansi::RESET)
    }

    fn format_result(&self, result: &CheckResult, output: &mut Vec<u8>) {
        match result {
            CheckResult::Passed { .. } | CheckResult::Failed { .. } => {
                self.format_evaluated(result, output);
            }
            CheckResult::Skipped {
                source,
                reason,
                classification,
            } if self.verbose >= 1 => {
                let line = format!("{source:<SOURCE_WIDTH$} skipped: {reason}");
                writeln!(output, "{}", self.colorize(&line, ansi::DIM)).ok();
                Self::format_statuses(classification, output);
            }
            CheckResult::Excluded { source } if self.verbose >= 1 => {
                let line = format!("{source:<SOURCE_WIDTH$} excluded");
                writeln!(output, "{}", self.colorize(&line, ansi::DIM)).ok();
            }
            CheckResult::Skipped { .. } | CheckResult::Excluded { .. } => {}
        }
    }

    fn format_evaluated(&self, result: &CheckResult, output: &mut Vec<u8>) {
        let (Some(classification), Some(percent)) =
            (result.classification(), result.bad_percent())
        else {
            return;
        };

        let stats = format!(
            "(good:{:>COUNT_WIDTH$} bad:{:>COUNT_WIDTH$})",
            group_thousands(classification.good),
            group_thousands(classification.bad)
        );
        let line = format!(
            "{:<SOURCE_WIDTH$} {stats:<STATS_WIDTH$} {percent:>10.2}%",
            result.source()
        );
        if result.is_failed() {
            writeln!(output, "{}", self.colorize(&line, ansi::RED)).ok();
        } else {
            writeln!(output, "{line}").ok();
        }

        if self.verbose >= 1 {
            Self::format_statuses(classification, output);
        }
    }

    fn format_statuses(classification: &Classification, output: &mut Vec<u8>) {
        for status in &classification.statuses {
            writeln!(
                output,
                "    {:<STATUS_WIDTH$} {:>COUNT_WIDTH$} {}",
                status.status,
                group_thousands(status.count),
                status.class.as_str()
            )
            .ok();
        }
    }

    fn format_failures(&self, evaluation: &Evaluation, output: &mut Vec<u8>) {
        let flagged = evaluation.flagged_count();
        if flagged == 0 {
            return;
        }

        writeln!(output).ok();
        let headline = format!("{flagged} sources have a bad ratio over threshold.");
        writeln!(output, "{}", self.colorize(&headline, ansi::RED)).ok();

        for result in evaluation.flagged() {
            let statuses = result
                .bad_statuses()
                .iter()
                .filter(|(_, count)| *count > 0)
                .map(|(status, count)| format!("{status}:{}", group_thousands(*count)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(output, "{:<SOURCE_WIDTH$} ({statuses})", result.source()).ok();
        }
    }

    fn format_summary(evaluation: &Evaluation, output: &mut Vec<u8>) {
        writeln!(
            output,
            "Summary: {} sources, {} passed, {} flagged, {} skipped, {} excluded",
            evaluation.results().len(),
            evaluation.passed_count(),
            evaluation.flagged_count(),
            evaluation.skipped_count(),
            evaluation.excluded_count()
        )
        .ok();
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, evaluation: &Evaluation) -> Result<String> {
        let mut output = Vec::new();

        if !self.quiet {
            for result in evaluation.results() {
                self.format_result(result, &mut output);
            }
        }

        self.format_failures(evaluation, &mut output);

        if self.verbose >= 1 && !self.quiet {
            writeln!(output).ok();
            Self::format_summary(evaluation, &mut output);
        }

        Ok(String::from_utf8_lossy(&output).to_string())
    }
}

/// `1234567` -> `"1,234,567"`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
