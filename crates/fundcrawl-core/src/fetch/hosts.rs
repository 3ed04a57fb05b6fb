//! Per-host connection caps.
//!
//! reqwest only bounds idle connections per host. A permit from here is held
//! for the whole request/response lifetime, so at most `per_host` requests
//! to one `host:port` are in flight at once across all clones of a fetcher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Idle entries are pruned once the map grows past this.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug)]
pub(crate) struct HostLimiter {
    per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    pub(crate) fn new(per_host: usize) -> Self {
        Self {
            per_host,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for a connection slot for `url`'s host.
    pub(crate) async fn acquire(&self, url: &Url) -> Option<OwnedSemaphorePermit> {
        let semaphore = {
            let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
            if hosts.len() > PRUNE_THRESHOLD {
                // Held permits keep a strong ref; unreferenced ones are idle.
                hosts.retain(|_, s| Arc::strong_count(s) > 1);
            }
            hosts
                .entry(host_key(url))
                .or_insert_with(|| Arc::new(Semaphore::new(self.per_host)))
                .clone()
        };

        semaphore.acquire_owned().await.ok()
    }

    #[cfg(test)]
    fn available(&self, url: &Url) -> Option<usize> {
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts.get(&host_key(url)).map(|s| s.available_permits())
    }
}

fn host_key(url: &Url) -> String {
    format!(
        "{}:{}",
        url.host_str().unwrap_or_default(),
        url.port_or_known_default().unwrap_or_default()
    )
}
