use super::classify::Classification;

/// Why a source was left out of the ratio check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No good or bad samples at all (everything neutral, or an empty row).
    NoSamples,
    /// Fewer good + bad samples than the configured minimum.
    TooFewSamples { total: u64, minimum: u64 },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSamples => write!(f, "no good or bad samples"),
            Self::TooFewSamples { total, minimum } => {
                write!(f, "{total} samples, below minimum of {minimum}")
            }
        }
    }
}

/// Outcome of checking one report row.
///
/// Only `Passed` and `Failed` carry a ratio; `Failed` additionally carries
/// the bad statuses ordered by count so the offenders can be listed.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    Excluded {
        source: String,
    },
    Skipped {
        source: String,
        reason: SkipReason,
        classification: Classification,
    },
    Passed {
        source: String,
        classification: Classification,
        bad_percent: f64,
        threshold: f64,
    },
    Failed {
        source: String,
        classification: Classification,
        bad_percent: f64,
        threshold: f64,
        bad_statuses: Vec<(String, u64)>,
    },
}

impl CheckResult {
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Excluded { source }
            | Self::Skipped { source, .. }
            | Self::Passed { source, .. }
            | Self::Failed { source, .. } => source,
        }
    }

    #[must_use]
    pub const fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Excluded { .. } => None,
            Self::Skipped { classification, .. }
            | Self::Passed { classification, .. }
            | Self::Failed { classification, .. } => Some(classification),
        }
    }

    #[must_use]
    pub const fn bad_percent(&self) -> Option<f64> {
        match self {
            Self::Passed { bad_percent, .. } | Self::Failed { bad_percent, .. } => {
                Some(*bad_percent)
            }
            Self::Excluded { .. } | Self::Skipped { .. } => None,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> Option<f64> {
        match self {
            Self::Passed { threshold, .. } | Self::Failed { threshold, .. } => Some(*threshold),
            Self::Excluded { .. } | Self::Skipped { .. } => None,
        }
    }

    /// Bad statuses of a flagged source, highest count first. Empty otherwise.
    #[must_use]
    pub fn bad_statuses(&self) -> &[(String, u64)] {
        match self {
            Self::Failed { bad_statuses, .. } => bad_statuses,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    // Type predicates

    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        matches!(self, Self::Excluded { .. })
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether a ratio was computed for this source.
    #[must_use]
    pub const fn is_evaluated(&self) -> bool {
        self.is_passed() || self.is_failed()
    }
}
