use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Result, UptakeGuardError};

/// Row field holding the source identifier; every other field is a status.
pub const SOURCE_FIELD: &str = "source";

/// One input record: a source and its status counts, in report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub source: String,
    pub counts: IndexMap<String, u64>,
}

impl SourceRow {
    #[must_use]
    pub fn new<S: Into<String>>(
        source: impl Into<String>,
        counts: impl IntoIterator<Item = (S, u64)>,
    ) -> Self {
        Self {
            source: source.into(),
            counts: counts
                .into_iter()
                .map(|(status, count)| (status.into(), count))
                .collect(),
        }
    }

    fn from_json(index: usize, row: &Value) -> Result<Self> {
        let Some(fields) = row.as_object() else {
            return Err(malformed(format!("row {index} is not an object")));
        };
        let source = fields
            .get(SOURCE_FIELD)
            .ok_or_else(|| malformed(format!("row {index} has no `{SOURCE_FIELD}` field")))?
            .as_str()
            .ok_or_else(|| malformed(format!("row {index}: `{SOURCE_FIELD}` is not a string")))?;

        let mut counts = IndexMap::with_capacity(fields.len().saturating_sub(1));
        for (status, value) in fields {
            if status == SOURCE_FIELD || value.is_null() {
                continue;
            }
            let count = as_count(value).ok_or_else(|| {
                malformed(format!(
                    "row {index} ({source}): count for `{status}` is not a non-negative integer: {value}"
                ))
            })?;
            counts.insert(status.clone(), count);
        }

        Ok(Self {
            source: source.to_string(),
            counts,
        })
    }
}

/// Parse a query-result document into rows.
///
/// Expected shape: `{"query_result": {"data": {"rows": [...]}}}`.
///
/// # Errors
/// Returns [`UptakeGuardError::MalformedReport`] if the body is not JSON, a
/// key is missing, or a row is malformed.
pub fn parse_report(body: &str) -> Result<Vec<SourceRow>> {
    let document: Value =
        serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    let rows = document
        .get("query_result")
        .ok_or_else(|| missing("query_result"))?
        .get("data")
        .ok_or_else(|| missing("query_result.data"))?
        .get("rows")
        .ok_or_else(|| missing("query_result.data.rows"))?
        .as_array()
        .ok_or_else(|| malformed("`query_result.data.rows` is not an array".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| SourceRow::from_json(index, row))
        .collect()
}

/// Integer counts, also accepting whole floats such as `1000.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn missing(key: &str) -> UptakeGuardError {
    malformed(format!("missing key `{key}`"))
}

const fn malformed(message: String) -> UptakeGuardError {
    UptakeGuardError::MalformedReport(message)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
