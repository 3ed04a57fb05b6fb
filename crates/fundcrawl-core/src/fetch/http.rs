//! HTTP layer: one GET, classified into an [`AttemptOutcome`].
//!
//! This is the ONLY place for status code handling.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use reqwest::StatusCode;
use url::Url;

use crate::config::CrawlConfig;
use crate::error::CrawlError;

use super::hosts::HostLimiter;
use super::retry::AttemptOutcome;

/// Initial buffer size when the server sends no Content-Length.
const DEFAULT_BUFFER: usize = 8 * 1024;

/// Upper bound on the up-front allocation, whatever Content-Length claims.
const MAX_PREALLOC: usize = DEFAULT_BUFFER * 128;

/// HTTP backend (holds the pooled reqwest client, host caps, config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) hosts: Arc<HostLimiter>,
    pub(crate) config: CrawlConfig,
}

impl HttpBackend {
    pub(crate) fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.req_timeout)
            .connect_timeout(config.req_timeout)
            .pool_idle_timeout(config.req_timeout)
            .pool_max_idle_per_host(config.max_host_conns)
            .build()
            .map_err(|e| CrawlError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            hosts: Arc::new(HostLimiter::new(config.max_host_conns)),
            config,
        })
    }

    /// A single GET. Transport and body-read failures are retriable,
    /// any status other than 200 is terminal.
    pub(crate) async fn get_once(&self, url: &str) -> AttemptOutcome<Bytes> {
        let network = |message: String| {
            AttemptOutcome::Retry(CrawlError::Network {
                url: url.to_string(),
                message,
            })
        };

        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => return network(format!("invalid URL: {}", e)),
        };

        // Released when this function returns, after the body is drained.
        let _permit = match self.hosts.acquire(&parsed).await {
            Some(p) => p,
            None => return network("connection slot unavailable".to_string()),
        };

        let mut response = match self.client.get(parsed).send().await {
            Ok(r) => r,
            Err(e) => return network(e.to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            drain(&mut response).await;
            return AttemptOutcome::Fail(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match read_limited(&mut response, self.config.max_bytes).await {
            Ok(body) => {
                drain(&mut response).await;
                AttemptOutcome::Done(body)
            }
            Err(e) => AttemptOutcome::Retry(CrawlError::BodyRead {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Read at most `max_bytes` of the body. The rest is left unread.
async fn read_limited(response: &mut reqwest::Response, max_bytes: u64) -> reqwest::Result<Bytes> {
    let limit = usize::try_from(max_bytes).unwrap_or(usize::MAX);
    let mut buf = BytesMut::with_capacity(initial_capacity(response.content_length(), limit));

    while buf.len() < limit {
        match response.chunk().await? {
            Some(chunk) => {
                let take = chunk.len().min(limit - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }

    Ok(buf.freeze())
}

/// Buffer size to start with. Content-Length is only a hint from the server,
/// so it never raises the allocation past `MAX_PREALLOC`.
fn initial_capacity(content_length: Option<u64>, limit: usize) -> usize {
    content_length
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_BUFFER)
        .min(limit)
        .min(MAX_PREALLOC)
}

/// Consume whatever is left so the connection can go back to the pool.
/// Bounded by the client timeout.
async fn drain(response: &mut reqwest::Response) {
    while let Ok(Some(_)) = response.chunk().await {}
}
