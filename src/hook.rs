// Reporting hook - runs after each test and publishes its record
//
// This is the boundary between the test framework and the reporting
// pipeline. Nothing raised below it reaches the caller.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::Config;
use crate::gate::PublishGate;
use crate::publish::{ElasticPublisher, PublishError, PublishOutcome, RecordSink, UnavailableSink};
use crate::state::{RunRecord, TestContext};

/// Tag holding the per-process run id
pub const RUN_ID_TAG: &str = "run_id";

/// Tag holding the host name
pub const HOST_TAG: &str = "host";

/// Post-test callback: build, gate, submit, log.
pub struct ReportingHook {
    gate: PublishGate,
    sink: Arc<dyn RecordSink>,
    deadline: Duration,
    environment: BTreeMap<String, String>,
}

impl ReportingHook {
    pub fn new(gate: PublishGate, sink: Arc<dyn RecordSink>, deadline: Duration) -> Self {
        Self {
            gate,
            sink,
            deadline,
            environment: BTreeMap::new(),
        }
    }

    /// Wire up a hook from configuration with an Elasticsearch publisher.
    ///
    /// Never fails. The publisher is only built when the gate is open; if it
    /// cannot be built the error is logged and every invocation reports
    /// `Failed` instead.
    pub fn from_config(config: &Config) -> Self {
        let gate = PublishGate::from_config(config);
        let sink: Arc<dyn RecordSink> = if gate.is_enabled() {
            match ElasticPublisher::new(&config.elastic) {
                Ok(publisher) => Arc::new(publisher),
                Err(e) => {
                    error!(kind = "misconfigured", "result publishing unavailable: {}", e);
                    Arc::new(UnavailableSink::new(e.to_string()))
                }
            }
        } else {
            Arc::new(UnavailableSink::new("publishing disabled"))
        };

        Self::new(gate, sink, config.elastic.submit_deadline())
            .with_environment(default_environment(&config.publish.tags))
    }

    /// Tags added to every record. Context tags take precedence.
    pub fn with_environment(mut self, environment: BTreeMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn gate(&self) -> PublishGate {
        self.gate
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// Report one completed test. Never fails and never panics on sink errors.
    pub async fn after_test_execution(&self, ctx: &TestContext) -> PublishOutcome {
        if !self.gate.is_enabled() {
            info!(
                test = %ctx.id,
                "skipping publish for test {}: publishing disabled", ctx.id
            );
            return PublishOutcome::Skipped;
        }

        let record = RunRecord::build_with_environment(ctx, &self.environment);
        info!(
            test = record.test_name(),
            status = %record.status(),
            "publishing result for test {}", record.test_name()
        );

        let result = match tokio::time::timeout(self.deadline, self.sink.submit(&record)).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::Timeout {
                after: self.deadline,
            }),
        };

        match result {
            Ok(()) => PublishOutcome::Published,
            Err(e) => {
                error!(
                    test = record.test_name(),
                    kind = e.kind(),
                    "publish failed for test {}: {}", record.test_name(), e
                );
                PublishOutcome::Failed(e)
            }
        }
    }
}

/// Environment tags every record carries: a fresh run id, the host and
/// any statically configured tags.
pub fn default_environment(static_tags: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut environment = BTreeMap::new();
    environment.insert(RUN_ID_TAG.to_string(), uuid::Uuid::new_v4().to_string());

    if let Some(host) = host_name() {
        environment.insert(HOST_TAG.to_string(), host);
    }

    environment.extend(static_tags.iter().map(|(k, v)| (k.clone(), v.clone())));
    environment
}

fn host_name() -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_environment_has_run_id() {
        let env = default_environment(&BTreeMap::new());
        let run_id = env.get(RUN_ID_TAG).expect("run id tag");
        assert!(uuid::Uuid::parse_str(run_id).is_ok());
    }

    #[test]
    fn test_static_tags_override_generated() {
        let mut tags = BTreeMap::new();
        tags.insert(RUN_ID_TAG.to_string(), "nightly-42".to_string());
        tags.insert("team".to_string(), "payments".to_string());

        let env = default_environment(&tags);
        assert_eq!(env.get(RUN_ID_TAG).map(String::as_str), Some("nightly-42"));
        assert_eq!(env.get("team").map(String::as_str), Some("payments"));
    }

    #[test]
    fn test_from_config_reads_gate() {
        let mut config = Config::default();
        let hook = ReportingHook::from_config(&config);
        assert!(!hook.gate().is_enabled());

        config.publish.enabled = true;
        let hook = ReportingHook::from_config(&config);
        assert!(hook.gate().is_enabled());
    }

    #[tokio::test]
    async fn test_bad_url_with_gate_closed_still_skips() {
        let mut config = Config::default();
        config.elastic.url = "not a url".to_string();
        config.elastic.index = String::new();

        let hook = ReportingHook::from_config(&config);
        let outcome = hook
            .after_test_execution(&TestContext::passed("A", Duration::ZERO))
            .await;
        assert!(outcome.is_skipped());
    }

    #[tokio::test]
    async fn test_bad_url_with_gate_open_fails_each_test() {
        let mut config = Config::default();
        config.publish.enabled = true;
        config.elastic.url = "not a url".to_string();

        let hook = ReportingHook::from_config(&config);
        for id in ["A", "B"] {
            let outcome = hook
                .after_test_execution(&TestContext::failed(id, "boom", Duration::ZERO))
                .await;
            assert!(matches!(
                outcome.error(),
                Some(PublishError::Misconfigured { .. })
            ));
        }
    }
}
