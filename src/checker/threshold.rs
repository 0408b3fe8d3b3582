use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::Policy;
use crate::error::{Result, UptakeGuardError};
use crate::fetcher::SourceRow;

use super::Checker;
use super::classify::classify;
use super::result::{CheckResult, SkipReason};

/// Shell-style source exclusion. `*` also matches `/`.
#[derive(Debug, Clone)]
pub struct SourceExcluder {
    set: GlobSet,
}

impl SourceExcluder {
    /// # Errors
    /// Returns [`UptakeGuardError::InvalidPattern`] for the first pattern
    /// that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(compile_source_glob(pattern)?);
        }
        let set = builder.build().map_err(|source| UptakeGuardError::InvalidPattern {
            pattern: patterns
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;
        Ok(Self { set })
    }

    #[must_use]
    pub fn is_excluded(&self, source: &str) -> bool {
        self.set.is_match(source)
    }
}

/// Compile a shell-style pattern. Braces and backslashes are literal, as
/// in `fnmatch`.
///
/// # Errors
/// Returns [`UptakeGuardError::InvalidPattern`] if the pattern does not
/// compile.
pub fn compile_source_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(&escape_braces(pattern))
        .backslash_escape(false)
        .build()
        .map_err(|source| UptakeGuardError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Wrap `{` and `}` outside character classes in `[...]` so they match
/// themselves.
fn escape_braces(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    let mut class_start: Option<usize> = None;
    for (i, c) in pattern.char_indices() {
        match (c, class_start) {
            ('[', None) => class_start = Some(i),
            // `]` right after `[` or `[!` is a literal member of the class.
            (']', Some(start)) if !matches!(&pattern[start + 1..i], "" | "!") => {
                class_start = None;
            }
            ('{' | '}', None) => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
                continue;
            }
            _ => {}
        }
        escaped.push(c);
    }
    escaped
}

/// Applies the uptake policy to one report row at a time.
#[derive(Debug, Clone)]
pub struct UptakeChecker {
    policy: Policy,
    excluder: SourceExcluder,
}

impl UptakeChecker {
    /// # Errors
    /// Returns an error if an exclusion pattern is invalid.
    pub fn new(policy: Policy) -> Result<Self> {
        let excluder = SourceExcluder::new(&policy.exclude_sources)?;
        Ok(Self { policy, excluder })
    }

    #[must_use]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl Checker for UptakeChecker {
    fn check(&self, row: &SourceRow) -> CheckResult {
        let source = row.source.clone();

        if self.excluder.is_excluded(&source) {
            debug!(%source, "excluded by pattern");
            return CheckResult::Excluded { source };
        }

        let classification = classify(&row.counts, &self.policy);
        let total = classification.total();
        let minimum = self.policy.min_total_entries;

        let Some(bad_percent) = classification.bad_percent() else {
            debug!(%source, "no good or bad samples");
            return CheckResult::Skipped {
                source,
                reason: SkipReason::NoSamples,
                classification,
            };
        };

        if total < minimum {
            debug!(%source, total, minimum, "too few samples");
            return CheckResult::Skipped {
                source,
                reason: SkipReason::TooFewSamples { total, minimum },
                classification,
            };
        }

        let threshold = self.policy.threshold_for(&source);
        if bad_percent > threshold {
            let bad_statuses = classification.bad_statuses();
            CheckResult::Failed {
                source,
                classification,
                bad_percent,
                threshold,
                bad_statuses,
            }
        } else {
            CheckResult::Passed {
                source,
                classification,
                bad_percent,
                threshold,
            }
        }
    }
}

#[cfg(test)]
#[path = "threshold_tests.rs"]
mod tests;
