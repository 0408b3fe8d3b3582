mod classify;
mod evaluation;
mod result;
mod threshold;

pub use classify::{Classification, StatusClass, StatusCount, classify, classify_status};
pub use evaluation::{Evaluation, evaluate};
pub use result::{CheckResult, SkipReason};
pub use threshold::{SourceExcluder, UptakeChecker, compile_source_glob};

use crate::fetcher::SourceRow;

pub trait Checker {
    /// Check one report row against the configured policy.
    ///
    /// Exclusion is decided first, then the sample gates, then the ratio.
    fn check(&self, row: &SourceRow) -> CheckResult;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
