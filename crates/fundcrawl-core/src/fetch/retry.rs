//! Bounded retry loop over explicit attempt outcomes.
//!
//! No HTTP here: an attempt reports what happened, the loop decides whether
//! to go again.

use std::future::Future;

use crate::error::{CrawlError, CrawlResult};

/// What a single attempt produced.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    /// Success; stop.
    Done(T),

    /// Failed, another attempt may succeed.
    Retry(CrawlError),

    /// Failed for good; stop.
    Fail(CrawlError),
}

impl<T> AttemptOutcome<T> {
    /// Classify a result using [`CrawlError::is_retryable`].
    pub fn from_result(result: CrawlResult<T>) -> Self {
        match result {
            Ok(v) => Self::Done(v),
            Err(e) if e.is_retryable() => Self::Retry(e),
            Err(e) => Self::Fail(e),
        }
    }

    pub fn error(&self) -> Option<&CrawlError> {
        match self {
            Self::Done(_) => None,
            Self::Retry(e) | Self::Fail(e) => Some(e),
        }
    }
}

/// Run `attempt` up to `attempts` times, sequentially.
///
/// `attempt` receives the 1-based attempt number. Stops at the first `Done`
/// or `Fail`; otherwise returns the error of the last `Retry`.
pub async fn run_attempts<T, F, Fut>(attempts: u32, mut attempt: F) -> CrawlResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome<T>>,
{
    let mut last_error = None;

    for n in 1..=attempts {
        match attempt(n).await {
            AttemptOutcome::Done(value) => return Ok(value),
            AttemptOutcome::Fail(e) => return Err(e),
            AttemptOutcome::Retry(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| CrawlError::Config {
        message: "attempts must be at least 1".to_string(),
    }))
}
