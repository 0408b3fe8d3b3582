use serde::Serialize;

use crate::checker::{CheckResult, Evaluation, StatusCount};
use crate::error::Result;

use super::OutputFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: Summary,
    results: Vec<SourceResult<'a>>,
}

#[derive(Serialize)]
struct Summary {
    total_sources: usize,
    passed: usize,
    flagged: usize,
    skipped: usize,
    excluded: usize,
}

#[derive(Serialize)]
struct SourceResult<'a> {
    source: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    good: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bad: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    neutral: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bad_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
    #[serde(skip_serializing_if = "no_statuses")]
    statuses: &'a [StatusCount],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bad_statuses: Vec<BadStatus<'a>>,
}

#[derive(Serialize)]
struct BadStatus<'a> {
    status: &'a str,
    count: u64,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, evaluation: &Evaluation) -> Result<String> {
        let output = JsonOutput {
            summary: Summary {
                total_sources: evaluation.results().len(),
                passed: evaluation.passed_count(),
                flagged: evaluation.flagged_count(),
                skipped: evaluation.skipped_count(),
                excluded: evaluation.excluded_count(),
            },
            results: evaluation.results().iter().map(convert_result).collect(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

fn no_statuses(statuses: &&[StatusCount]) -> bool {
    statuses.is_empty()
}

fn convert_result(result: &CheckResult) -> SourceResult<'_> {
    let status = match result {
        CheckResult::Excluded { .. } => "excluded",
        CheckResult::Skipped { .. } => "skipped",
        CheckResult::Passed { .. } => "passed",
        CheckResult::Failed { .. } => "flagged",
    };
    let classification = result.classification();

    SourceResult {
        source: result.source(),
        status,
        reason: result.skip_reason().map(|r| r.to_string()),
        good: classification.map(|c| c.good),
        bad: classification.map(|c| c.bad),
        neutral: classification.map(|c| c.neutral),
        bad_percent: result.bad_percent(),
        threshold: result.threshold(),
        statuses: classification
            .map(|c| c.statuses.as_slice())
            .unwrap_or_default(),
        bad_statuses: result
            .bad_statuses()
            .iter()
            .map(|(status, count)| BadStatus {
                status,
                count: *count,
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
