//! Retrying HTTP fetch engine.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs,
//! the retry decision in retry.rs.

use bytes::Bytes;
use tracing::{info, warn};

use crate::config::CrawlConfig;
use crate::error::CrawlResult;

mod hosts;
mod http;
pub mod retry;

use http::HttpBackend;
use retry::{run_attempts, AttemptOutcome};

/// Fetches URLs with bounded retries over a shared connection pool.
///
/// Cheap to clone; clones share the pool and the per-host caps.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: HttpBackend,
}

impl Fetcher {
    pub fn new(config: CrawlConfig) -> CrawlResult<Self> {
        Ok(Self {
            http: HttpBackend::new(config)?,
        })
    }

    pub fn from_env() -> CrawlResult<Self> {
        Self::new(CrawlConfig::from_env())
    }

    /// GET `url`, retrying transport and body-read failures up to
    /// `attempts` times. A non-200 status is returned at once.
    pub async fn fetch(&self, url: &str) -> CrawlResult<Bytes> {
        run_attempts(self.http.config.attempts, move |attempt| async move {
            let outcome = self.http.get_once(url).await;
            log_attempt(url, attempt, &outcome);
            outcome
        })
        .await
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.http.config
    }
}

fn log_attempt(url: &str, attempt: u32, outcome: &AttemptOutcome<Bytes>) {
    match outcome {
        AttemptOutcome::Done(body) => {
            info!(method = "GET", url = %url, attempt, bytes = body.len(), "GET {} -> OK", url);
        }
        AttemptOutcome::Retry(e) | AttemptOutcome::Fail(e) => {
            warn!(
                method = "GET",
                url = %url,
                attempt,
                retryable = e.is_retryable(),
                "GET {} -> {}",
                url,
                e
            );
        }
    }
}
