// Publish command - feed completed tests from a file through the reporting hook

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{debug, warn};

use crate::cli::args::PublishArgs;
use crate::config::Config;
use crate::hook::ReportingHook;
use crate::state::{PublishSummary, TestContext};

pub async fn handle_publish(args: &PublishArgs, mut config: Config) -> Result<PublishSummary> {
    if args.enable {
        config.publish.enabled = true;
    }
    if let Some(url) = &args.url {
        config.elastic.url = url.clone();
    }
    if let Some(index) = &args.index {
        config.elastic.index = index.clone();
    }

    let contexts = read_contexts(&args.file)?;
    debug!("Loaded {} test results from {}", contexts.len(), args.file.display());

    let hook = ReportingHook::from_config(&config);
    let summary = publish_all(&hook, &contexts, args.parallel).await;

    println!(
        "{} results: {} published, {} skipped, {} failed",
        summary.total(),
        summary.published(),
        summary.skipped(),
        summary.failed()
    );

    if args.strict && !summary.all_delivered() {
        anyhow::bail!("{} results could not be published", summary.failed());
    }

    Ok(summary)
}

/// Run every context through the hook with at most `parallel` in flight
pub async fn publish_all(
    hook: &ReportingHook,
    contexts: &[TestContext],
    parallel: usize,
) -> PublishSummary {
    let mut outcomes = stream::iter(contexts)
        .map(|ctx| hook.after_test_execution(ctx))
        .buffer_unordered(parallel.max(1));

    let mut summary = PublishSummary::new();
    while let Some(outcome) = outcomes.next().await {
        summary.add(&outcome);
    }
    summary
}

/// Read a JSON array, or one JSON object per line
pub fn read_contexts(path: &Path) -> Result<Vec<TestContext>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;
    parse_contexts(&content).with_context(|| format!("Invalid results file: {}", path.display()))
}

pub fn parse_contexts(content: &str) -> Result<Vec<TestContext>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut contexts = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<TestContext>(line) {
            Ok(ctx) => contexts.push(ctx),
            Err(e) => warn!("Skipping line {}: {}", line_no + 1, e),
        }
    }
    Ok(contexts)
}
