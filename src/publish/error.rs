//! Error types for result publishing.

use std::time::Duration;

/// Failures while delivering a record to the index.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Backend could not be reached (DNS, refused connection, TLS handshake).
    #[error("backend unreachable: {message}")]
    Unreachable { message: String },

    /// The request did not complete in time.
    #[error("timed out after {after:?}")]
    Timeout { after: Duration },

    /// Credentials missing or refused (401/403).
    #[error("unauthorized (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Backend refused the document (4xx other than auth).
    #[error("document rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Backend failed while handling the request (5xx).
    #[error("backend error (HTTP {status}): {body}")]
    Backend { status: u16, body: String },

    /// Any other transport level failure.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Publisher could not be set up from configuration.
    #[error("publisher misconfigured: {message}")]
    Misconfigured { message: String },

    /// Record could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PublishError {
    /// Whether a second attempt has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unreachable { .. } | Self::Timeout { .. } | Self::Backend { .. }
        )
    }

    /// Short machine friendly classification, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "unreachable",
            Self::Timeout { .. } => "timeout",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Rejected { .. } => "rejected",
            Self::Backend { .. } => "backend",
            Self::Transport { .. } => "transport",
            Self::Misconfigured { .. } => "misconfigured",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Map a non-success HTTP status plus its body to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized {
                status,
                message: body,
            },
            400..=499 => Self::Rejected { status, body },
            _ => Self::Backend { status, body },
        }
    }
}

/// Result alias for publishing.
pub type PublishResult<T> = Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            PublishError::from_status(401, String::new()),
            PublishError::Unauthorized { status: 401, .. }
        ));
        assert!(matches!(
            PublishError::from_status(403, String::new()),
            PublishError::Unauthorized { status: 403, .. }
        ));
        assert!(matches!(
            PublishError::from_status(400, "mapper_parsing_exception".into()),
            PublishError::Rejected { status: 400, .. }
        ));
        assert!(matches!(
            PublishError::from_status(503, String::new()),
            PublishError::Backend { status: 503, .. }
        ));
    }

    #[test]
    fn test_only_transient_errors_retry() {
        assert!(PublishError::from_status(502, String::new()).is_retryable());
        assert!(
            PublishError::Timeout {
                after: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(
            PublishError::Unreachable {
                message: "refused".into()
            }
            .is_retryable()
        );
        assert!(!PublishError::from_status(400, String::new()).is_retryable());
        assert!(!PublishError::from_status(401, String::new()).is_retryable());
    }

    #[test]
    fn test_display_includes_body() {
        let err = PublishError::from_status(404, "index_not_found_exception".into());
        assert_eq!(
            err.to_string(),
            "document rejected (HTTP 404): index_not_found_exception"
        );
        assert_eq!(err.kind(), "rejected");
    }
}
