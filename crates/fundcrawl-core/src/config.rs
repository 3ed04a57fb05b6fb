//! Fetch engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CrawlError, CrawlResult};

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("fundcrawl/", env!("CARGO_PKG_VERSION"));

/// Crawl configuration. Fixed for the lifetime of a [`crate::Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum concurrent (and idle) connections per host.
    #[serde(default = "default_max_host_conns")]
    pub max_host_conns: usize,

    /// Per-request timeout, applied to connect, the whole request, and idle pooled connections.
    #[serde(default = "default_req_timeout", with = "duration_str")]
    pub req_timeout: Duration,

    /// Maximum tries per fetch, including the first.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Response bodies are truncated to this many bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_host_conns() -> usize {
    4
}

fn default_req_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_attempts() -> u32 {
    3
}

fn default_max_bytes() -> u64 {
    1024 * 1024
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_host_conns: default_max_host_conns(),
            req_timeout: default_req_timeout(),
            attempts: default_attempts(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl CrawlConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `FUNDCRAWL_USER_AGENT` | `User-Agent` header |
    /// | `FUNDCRAWL_MAX_HOST_CONNS` | Connections per host |
    /// | `FUNDCRAWL_REQ_TIMEOUT` | Request timeout (`10s`, `500ms`) |
    /// | `FUNDCRAWL_ATTEMPTS` | Tries per fetch |
    /// | `FUNDCRAWL_MAX_BYTES` | Response body cap |
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            user_agent: std::env::var("FUNDCRAWL_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
            max_host_conns: std::env::var("FUNDCRAWL_MAX_HOST_CONNS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_host_conns),
            req_timeout: std::env::var("FUNDCRAWL_REQ_TIMEOUT")
                .ok()
                .and_then(|v| humantime::parse_duration(&v).ok())
                .unwrap_or_else(default_req_timeout),
            attempts: std::env::var("FUNDCRAWL_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_attempts),
            max_bytes: std::env::var("FUNDCRAWL_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_bytes),
        }
    }

    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> CrawlResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CrawlError::Config {
            message: format!("invalid config: {}", e),
        })
    }

    /// Load a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> CrawlResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CrawlError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&text)
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> CrawlResult<String> {
        serde_yaml::to_string(self).map_err(|e| CrawlError::Config {
            message: format!("failed to serialize config: {}", e),
        })
    }

    /// Reject values the fetch engine cannot work with.
    pub fn validate(&self) -> CrawlResult<()> {
        let invalid = |message: &str| {
            Err(CrawlError::Config {
                message: message.to_string(),
            })
        };

        if self.attempts == 0 {
            return invalid("attempts must be at least 1");
        }
        if self.max_host_conns == 0 {
            return invalid("max_host_conns must be at least 1");
        }
        if self.max_bytes == 0 {
            return invalid("max_bytes must be at least 1");
        }
        if self.req_timeout.is_zero() {
            return invalid("req_timeout must be non-zero");
        }
        if reqwest::header::HeaderValue::from_str(&self.user_agent).is_err() {
            return invalid("user_agent is not a valid header value");
        }
        Ok(())
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-host connection cap.
    pub fn with_max_host_conns(mut self, conns: usize) -> Self {
        self.max_host_conns = conns;
        self
    }

    /// Set the request timeout.
    pub fn with_req_timeout(mut self, timeout: Duration) -> Self {
        self.req_timeout = timeout;
        self
    }

    /// Set the number of tries per fetch.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the body size cap.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// `Duration` as a humantime string (`"10s"`, `"1m 30s"`).
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(d)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
