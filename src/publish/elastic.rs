//! HTTP publisher for Elasticsearch-compatible document APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, warn};

use super::{PublishError, PublishResult, RecordSink};
use crate::config::{ConfigError, ElasticConfig, RETRY_DELAY};
use crate::state::RunRecord;

/// User agent for index requests.
const USER_AGENT_VALUE: &str = concat!("resultsink/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in an error message.
const MAX_BODY_LEN: usize = 512;

#[derive(Debug, Clone)]
enum Auth {
    None,
    Basic {
        username: String,
        password: Option<String>,
    },
    ApiKey(String),
}

/// Posts one JSON document per record to `{url}/{index}/_doc`.
///
/// Cheap to clone; clones share the underlying connection pool, so a single
/// publisher can serve concurrently running tests.
#[derive(Debug, Clone)]
pub struct ElasticPublisher {
    client: reqwest::Client,
    endpoint: url::Url,
    auth: Auth,
    timeout: Duration,
    retry: u32,
}

impl ElasticPublisher {
    /// Create a publisher from configuration.
    pub fn new(config: &ElasticConfig) -> Result<Self, ConfigError> {
        let endpoint = config.document_url()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.request_timeout())
            .default_headers(default_headers)
            .build()
            .map_err(|e| ConfigError::Client {
                reason: e.to_string(),
            })?;

        let auth = match (&config.api_key, &config.username) {
            (Some(key), _) => Auth::ApiKey(key.clone()),
            (None, Some(username)) => Auth::Basic {
                username: username.clone(),
                password: config.password.clone(),
            },
            (None, None) => Auth::None,
        };

        Ok(Self {
            client,
            endpoint,
            auth,
            timeout: config.request_timeout(),
            retry: config.effective_retry(),
        })
    }

    /// Document endpoint records are sent to.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    async fn submit_once(&self, body: &[u8]) -> PublishResult<()> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec());

        request = match &self.auth {
            Auth::None => request,
            Auth::Basic { username, password } => request.basic_auth(username, password.as_ref()),
            Auth::ApiKey(key) => request.header(AUTHORIZATION, format!("ApiKey {}", key)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport(e, self.timeout))?;
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "document indexed");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(PublishError::from_status(status.as_u16(), truncate(body)))
    }
}

#[async_trait]
impl RecordSink for ElasticPublisher {
    async fn submit(&self, record: &RunRecord) -> PublishResult<()> {
        let body = record.to_document()?;
        let mut retries = 0;

        loop {
            match self.submit_once(&body).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && retries < self.retry => {
                    retries += 1;
                    warn!(
                        test = record.test_name(),
                        error = %e,
                        retry = retries,
                        "retrying publish"
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn classify_transport(err: reqwest::Error, timeout: Duration) -> PublishError {
    if err.is_timeout() {
        PublishError::Timeout { after: timeout }
    } else if err.is_connect() {
        PublishError::Unreachable {
            message: err.to_string(),
        }
    } else {
        PublishError::Transport {
            message: err.to_string(),
        }
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_BODY_LEN {
        let mut cut = MAX_BODY_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
