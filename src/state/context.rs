// Completed test context as handed over by the test framework

use crate::state::TestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Read-only view of one finished test invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestContext {
    /// Unique test identifier
    pub id: String,

    /// Human readable name, if the framework has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Owning suite or class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,

    pub status: TestStatus,

    pub started_at: DateTime<Utc>,

    #[serde(default, with = "duration_ms")]
    pub duration: Duration,

    /// Error message or stack text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl TestContext {
    /// Context for a test that finished just now
    pub fn new(id: impl Into<String>, status: TestStatus, duration: Duration) -> Self {
        let started_at = Utc::now()
            - chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            id: id.into(),
            display_name: None,
            suite: None,
            status,
            started_at,
            duration,
            failure: None,
            tags: BTreeMap::new(),
        }
    }

    /// Create a passed context
    pub fn passed(id: impl Into<String>, duration: Duration) -> Self {
        Self::new(id, TestStatus::Passed, duration)
    }

    /// Create a failed context
    pub fn failed(id: impl Into<String>, failure: impl Into<String>, duration: Duration) -> Self {
        Self {
            failure: Some(failure.into()),
            ..Self::new(id, TestStatus::Failed, duration)
        }
    }

    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.suite = Some(suite.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Durations travel as whole milliseconds
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
