// Configuration file handling

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub elastic: ElasticConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PublishConfig {
    /// Send results to the index. Absent means disabled.
    #[serde(default)]
    pub enabled: bool,

    /// Static tags attached to every record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticConfig {
    /// Base URL of the cluster
    #[serde(default = "default_url")]
    pub url: String,

    /// Target index
    #[serde(default = "default_index")]
    pub index: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retries after a transient failure (at most one is honored)
    #[serde(default)]
    pub retry: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Sent as `Authorization: ApiKey ...`; wins over basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            index: default_index(),
            timeout: default_timeout(),
            retry: 0,
            username: None,
            password: None,
            api_key: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid elastic url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to create HTTP client: {reason}")]
    Client { reason: String },
}

// Environment overrides
pub const ENV_PUBLISH_RESULTS: &str = "PUBLISH_RESULTS_TO_ELASTIC";
pub const ENV_ELASTIC_URL: &str = "RESULTSINK_ELASTIC_URL";
pub const ENV_ELASTIC_INDEX: &str = "RESULTSINK_ELASTIC_INDEX";
pub const ENV_ELASTIC_API_KEY: &str = "RESULTSINK_ELASTIC_API_KEY";

/// Upper bound on retries regardless of configuration
pub const MAX_RETRY: u32 = 1;

/// Pause before the single retry
pub const RETRY_DELAY: Duration = Duration::from_millis(250);

pub fn default_url() -> String {
    String::from("http://localhost:9200")
}

pub fn default_index() -> String {
    String::from("test-results")
}

pub fn default_timeout() -> u64 {
    3
}

impl ElasticConfig {
    /// Per-request timeout, never zero
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }

    /// Configured retries clamped to [`MAX_RETRY`]
    pub fn effective_retry(&self) -> u32 {
        self.retry.min(MAX_RETRY)
    }

    /// Longest a single submit may take including its retry
    pub fn submit_deadline(&self) -> Duration {
        let attempts = self.effective_retry() + 1;
        let delays = RETRY_DELAY * self.effective_retry();
        self.request_timeout() * attempts + delays
    }

    /// Endpoint a document is POSTed to
    pub fn document_url(&self) -> Result<url::Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason,
        };

        let base = url::Url::parse(&self.url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }

        let index = self.index.trim().trim_matches('/');
        if index.is_empty() {
            return Err(invalid("index name is empty".to_string()));
        }

        let joined = format!("{}/{}/_doc", self.url.trim_end_matches('/'), index);
        url::Url::parse(&joined).map_err(|e| invalid(e.to_string()))
    }

    /// Copy with secrets replaced for display
    pub fn masked(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "********".to_string());
        Self {
            password: mask(&self.password),
            api_key: mask(&self.api_key),
            ..self.clone()
        }
    }
}

impl Config {
    /// Find the first configuration file in the default locations
    pub fn discover() -> Option<PathBuf> {
        // Check locations in order:
        // 1. .resultsinkrc (current directory)
        // 2. ~/.resultsinkrc (home directory)
        // 3. .resultsinkrc.toml (current directory)
        // 4. ~/.resultsinkrc.toml (home directory)

        let cwd = std::env::current_dir().ok();
        let home = dirs::home_dir();

        let mut paths = Vec::new();
        for name in [".resultsinkrc", ".resultsinkrc.toml"] {
            if let Some(cwd) = &cwd {
                paths.push(cwd.join(name));
            }
            if let Some(home) = &home {
                paths.push(home.join(name));
            }
        }

        paths.into_iter().find(|p| p.exists())
    }

    /// Load configuration from default locations plus environment.
    ///
    /// Never fails: any problem is logged and defaults are used, which keeps
    /// publishing disabled.
    pub fn load() -> Self {
        let base = match Self::discover() {
            Some(path) => Self::load_from_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring configuration file: {}", e);
                Self::default()
            }),
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PUBLISH_RESULTS) {
            match parse_flag(&raw) {
                Some(enabled) => self.publish.enabled = enabled,
                None => warn!(
                    "Ignoring {}={:?}: expected true or false",
                    ENV_PUBLISH_RESULTS, raw
                ),
            }
        }
        if let Some(url) = lookup(ENV_ELASTIC_URL) {
            self.elastic.url = url;
        }
        if let Some(index) = lookup(ENV_ELASTIC_INDEX) {
            self.elastic.index = index;
        }
        if let Some(key) = lookup(ENV_ELASTIC_API_KEY) {
            self.elastic.api_key = Some(key);
        }
        self
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

/// Parse a boolean switch the way shells and CI systems spell it
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
