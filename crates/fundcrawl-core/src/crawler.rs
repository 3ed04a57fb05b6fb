//! Fetch, validate and provenance-check a manifest.

use std::sync::Arc;

use tracing::debug;

use crate::config::CrawlConfig;
use crate::error::{CrawlError, CrawlResult};
use crate::fetch::Fetcher;
use crate::manifest::{Manifest, UrlRef};
use crate::provenance;
use crate::schema::SchemaValidator;

/// The manifest pipeline. One call handles one manifest URL.
///
/// Cheap to clone; clones share the fetcher's connection pool.
#[derive(Clone)]
pub struct Crawler {
    fetcher: Fetcher,
    schema: Arc<dyn SchemaValidator>,
}

impl std::fmt::Debug for Crawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

impl Crawler {
    pub fn new(config: CrawlConfig, schema: impl SchemaValidator + 'static) -> CrawlResult<Self> {
        Ok(Self::with_fetcher(Fetcher::new(config)?, Arc::new(schema)))
    }

    pub fn with_fetcher(fetcher: Fetcher, schema: Arc<dyn SchemaValidator>) -> Self {
        Self { fetcher, schema }
    }

    /// Fetch the manifest at `url`, validate it and check every URL's provenance.
    pub async fn fetch_manifest(&self, url: &str) -> CrawlResult<Manifest> {
        let body = self.fetcher.fetch(url).await?;
        self.parse_manifest(&body, url, true).await
    }

    /// Decode and validate a body that was already retrieved from `source_url`.
    ///
    /// With `check_provenance`, the entity webpage and then each project's
    /// webpage and repository are verified in document order; the first
    /// failure is returned and nothing after it is checked.
    ///
    /// On a schema failure the validator's manifest travels inside the
    /// error (see [`CrawlError::manifest`]).
    pub async fn parse_manifest(
        &self,
        body: &[u8],
        source_url: &str,
        check_provenance: bool,
    ) -> CrawlResult<Manifest> {
        let mut manifest: Manifest =
            serde_json::from_slice(body).map_err(|e| CrawlError::Decode {
                message: e.to_string(),
            })?;

        manifest.url = source_url.to_string();
        manifest.body = String::from_utf8(body.to_vec()).map_err(|e| CrawlError::Decode {
            message: e.to_string(),
        })?;

        let manifest = self.schema.validate(manifest)?;
        debug!(url = %source_url, projects = manifest.projects.len(), "manifest passed schema validation");

        if check_provenance {
            for (target, url_ref) in manifest.provenance_targets() {
                provenance::verify(&self.fetcher, &target, url_ref, source_url).await?;
            }
        }

        Ok(manifest)
    }

    /// Check that `url_ref`'s `.well-known` list contains `manifest_url`.
    ///
    /// References with no list pass without a request. This keeps
    /// compatibility with manifests that publish none, at the cost of
    /// accepting claims that cannot be verified.
    pub async fn check_provenance(&self, url_ref: &UrlRef, manifest_url: &str) -> CrawlResult<()> {
        provenance::verify(&self.fetcher, &url_ref.url, url_ref, manifest_url).await
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }
}
