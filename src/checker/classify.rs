//! Pure good/bad/neutral split of one row's status counts.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::Policy;

/// Policy-assigned class of a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Good,
    Bad,
    Neutral,
}

impl StatusClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Neutral => "neutral",
        }
    }
}

/// Good wins over neutral when a status is listed in both.
#[must_use]
pub fn classify_status(status: &str, policy: &Policy) -> StatusClass {
    if policy.is_good(status) {
        StatusClass::Good
    } else if policy.is_neutral(status) {
        StatusClass::Neutral
    } else {
        StatusClass::Bad
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
    pub class: StatusClass,
}

/// Per-row sums plus every status with its class, in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub good: u64,
    pub bad: u64,
    pub neutral: u64,
    pub statuses: Vec<StatusCount>,
}

impl Classification {
    /// Samples that count towards the ratio (good + bad).
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.good.saturating_add(self.bad)
    }

    /// `100 * bad / (good + bad)`, or `None` when there are no samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bad_percent(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(100.0 * self.bad as f64 / total as f64)
    }

    /// Bad statuses sorted by count, highest first. Ties keep report order.
    /// Zero counts are kept; presentation decides whether to show them.
    #[must_use]
    pub fn bad_statuses(&self) -> Vec<(String, u64)> {
        let mut bad: Vec<_> = self
            .statuses
            .iter()
            .filter(|s| s.class == StatusClass::Bad)
            .map(|s| (s.status.clone(), s.count))
            .collect();
        bad.sort_by(|a, b| b.1.cmp(&a.1));
        bad
    }
}

/// Split `counts` into good, bad and neutral sums under `policy`.
#[must_use]
pub fn classify(counts: &IndexMap<String, u64>, policy: &Policy) -> Classification {
    let mut classification = Classification {
        statuses: Vec::with_capacity(counts.len()),
        ..Classification::default()
    };

    for (status, &count) in counts {
        let class = classify_status(status, policy);
        let sum = match class {
            StatusClass::Good => &mut classification.good,
            StatusClass::Bad => &mut classification.bad,
            StatusClass::Neutral => &mut classification.neutral,
        };
        *sum = sum.saturating_add(count);
        classification.statuses.push(StatusCount {
            status: status.clone(),
            count,
            class,
        });
    }

    classification
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
