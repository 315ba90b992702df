// State module - Test run data
// Completed test contexts, the records built from them and publish tallies

pub mod context;
pub mod record;

pub use context::TestContext;
pub use record::RunRecord;

use serde::{Deserialize, Serialize};

use crate::publish::PublishOutcome;

/// Test status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Passed,
    Failed,
    Aborted,
    Disabled,
}

impl TestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::Disabled => "DISABLED",
        }
    }

    /// Whether failure detail may be attached to a record with this status
    pub fn carries_detail(self) -> bool {
        !matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tally of publish outcomes across a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishSummary {
    total: usize,
    published: usize,
    skipped: usize,
    failed: usize,
}

impl PublishSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome
    pub fn add(&mut self, outcome: &PublishOutcome) {
        self.total += 1;

        match outcome {
            PublishOutcome::Published => self.published += 1,
            PublishOutcome::Skipped => self.skipped += 1,
            PublishOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn published(&self) -> usize {
        self.published
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// True when no record failed to publish
    pub fn all_delivered(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::PublishError;

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&TestStatus::Aborted).unwrap();
        assert_eq!(json, "\"ABORTED\"");

        let parsed: TestStatus = serde_json::from_str("\"DISABLED\"").unwrap();
        assert_eq!(parsed, TestStatus::Disabled);
    }

    #[test]
    fn test_only_passed_drops_detail() {
        assert!(!TestStatus::Passed.carries_detail());
        assert!(TestStatus::Failed.carries_detail());
        assert!(TestStatus::Aborted.carries_detail());
        assert!(TestStatus::Disabled.carries_detail());
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let mut summary = PublishSummary::new();
        summary.add(&PublishOutcome::Published);
        summary.add(&PublishOutcome::Skipped);
        summary.add(&PublishOutcome::Failed(PublishError::Timeout {
            after: std::time::Duration::from_secs(3),
        }));
        summary.add(&PublishOutcome::Published);

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.published(), 2);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_delivered());
    }
}
