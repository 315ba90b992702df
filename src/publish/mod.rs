// Publish module - delivery of run records to an external index

pub mod elastic;
pub mod error;

pub use elastic::ElasticPublisher;
pub use error::{PublishError, PublishResult};

use crate::state::RunRecord;
use async_trait::async_trait;

/// Destination for run records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Deliver one record. At-most-once; the caller decides what to do on error.
    async fn submit(&self, record: &RunRecord) -> PublishResult<()>;
}

/// Stands in for a publisher that could not be built; every submit fails.
#[derive(Debug, Clone)]
pub struct UnavailableSink {
    reason: String,
}

impl UnavailableSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl RecordSink for UnavailableSink {
    async fn submit(&self, _record: &RunRecord) -> PublishResult<()> {
        Err(PublishError::Misconfigured {
            message: self.reason.clone(),
        })
    }
}

/// Terminal state of one reporting attempt
#[derive(Debug)]
pub enum PublishOutcome {
    /// Gate disabled, sink never called
    Skipped,
    Published,
    /// Delivery failed; already logged
    Failed(PublishError),
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn error(&self) -> Option<&PublishError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
