// Run record - the document published for each completed test

use crate::state::context::duration_ms;
use crate::state::{TestContext, TestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Name used when a context carries neither an id nor a display name
pub const UNNAMED_TEST: &str = "unnamed-test";

/// Tag key the suite name is mirrored under
pub const SUITE_TAG: &str = "suite";

/// Immutable summary of one completed test.
///
/// Owns all of its data; changing the originating [`TestContext`] after
/// [`RunRecord::build`] has no effect on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    test_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    suite: Option<String>,

    status: TestStatus,

    #[serde(rename = "@timestamp")]
    started_at: DateTime<Utc>,

    #[serde(rename = "duration_ms", with = "duration_ms")]
    duration: Duration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,
}

impl RunRecord {
    /// Build a record from a completed test. Never fails.
    pub fn build(ctx: &TestContext) -> Self {
        Self::build_with_environment(ctx, &BTreeMap::new())
    }

    /// Build a record, layering the context's own tags over `environment`.
    pub fn build_with_environment(
        ctx: &TestContext,
        environment: &BTreeMap<String, String>,
    ) -> Self {
        let display_name = non_blank(ctx.display_name.as_deref());
        let suite = non_blank(ctx.suite.as_deref());

        let test_name = non_blank(Some(&ctx.id))
            .or_else(|| display_name.clone())
            .unwrap_or_else(|| UNNAMED_TEST.to_string());

        let failure = if ctx.status.carries_detail() {
            non_blank(ctx.failure.as_deref())
        } else {
            None
        };

        let mut tags = environment.clone();
        if let Some(suite) = &suite {
            tags.insert(SUITE_TAG.to_string(), suite.clone());
        }
        tags.extend(ctx.tags.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self {
            test_name,
            display_name,
            suite,
            status: ctx.status,
            started_at: ctx.started_at,
            duration: ctx.duration,
            failure,
            tags,
        }
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn suite(&self) -> Option<&str> {
        self.suite.as_deref()
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Encode as the JSON document sent to the index
    pub fn to_document(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
