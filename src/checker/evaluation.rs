use crate::fetcher::SourceRow;

use super::Checker;
use super::result::CheckResult;

/// Results of one run, in report row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    results: Vec<CheckResult>,
}

impl Evaluation {
    #[must_use]
    pub const fn new(results: Vec<CheckResult>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Sources whose bad ratio exceeded their threshold.
    pub fn flagged(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_passed()).count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_excluded()).count()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.flagged_count() == 0
    }
}

/// Check every row independently. Rows are neither merged nor reordered.
#[must_use]
pub fn evaluate<C: Checker + ?Sized>(checker: &C, rows: &[SourceRow]) -> Evaluation {
    Evaluation::new(rows.iter().map(|row| checker.check(row)).collect())
}
