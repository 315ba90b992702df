// Tests for run record construction - public API only

use resultsink::state::{RunRecord, TestContext, TestStatus};
use std::time::Duration;

#[test]
fn test_record_unaffected_by_context_mutation() {
    // Arrange
    let mut ctx = TestContext::failed("B", "assertion X failed", Duration::from_millis(20))
        .with_tag("browser", "firefox");
    let record = RunRecord::build(&ctx);

    // Act
    ctx.id = "changed".to_string();
    ctx.status = TestStatus::Passed;
    ctx.failure = Some("other".to_string());
    ctx.duration = Duration::from_secs(9);
    ctx.tags.insert("browser".to_string(), "chrome".to_string());

    // Assert
    assert_eq!(record.test_name(), "B");
    assert_eq!(record.status(), TestStatus::Failed);
    assert_eq!(record.failure(), Some("assertion X failed"));
    assert_eq!(record.duration(), Duration::from_millis(20));
    assert_eq!(record.tags().get("browser").map(String::as_str), Some("firefox"));
}

#[test]
fn test_record_backend_round_trip() {
    // Arrange
    let ctx = TestContext::failed("checkout_total", "expected 10, got 12", Duration::from_millis(1234))
        .with_suite("CartTests")
        .with_display_name("Checkout total is correct");
    let record = RunRecord::build(&ctx);

    // Act
    let document = record.to_document().expect("record encodes");
    let parsed: RunRecord = serde_json::from_slice(&document).expect("document decodes");

    // Assert
    assert_eq!(parsed, record);
    assert_eq!(parsed.test_name(), "checkout_total");
    assert_eq!(parsed.status(), TestStatus::Failed);
    assert_eq!(parsed.duration(), Duration::from_millis(1234));
    assert_eq!(parsed.failure(), Some("expected 10, got 12"));
}

#[test]
fn test_every_status_builds() {
    for status in [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Aborted,
        TestStatus::Disabled,
    ] {
        let mut ctx = TestContext::new("t", status, Duration::ZERO);
        ctx.failure = Some("reason".to_string());

        let record = RunRecord::build(&ctx);
        assert_eq!(record.status(), status);
        assert_eq!(record.failure().is_some(), status != TestStatus::Passed);
    }
}

#[test]
fn test_timestamp_serialized_as_rfc3339() {
    let json = r#"{"id": "a", "status": "PASSED", "started_at": "2026-10-18T09:30:00Z", "duration": 7}"#;
    let ctx: TestContext = serde_json::from_str(json).unwrap();

    let value = serde_json::to_value(RunRecord::build(&ctx)).unwrap();
    assert_eq!(value["@timestamp"], "2026-10-18T09:30:00Z");
    assert_eq!(value["duration_ms"], 7);
}
