//! Provenance verification against `.well-known` disclosure lists.
//!
//! A domain vouches for a manifest by listing the manifest URL, verbatim, on
//! its own line in the list it publishes. Lines are split on `\n` only and
//! compared byte-for-byte: no trimming, no normalisation.

use tracing::debug;

use crate::error::{CrawlError, CrawlResult, ProvenanceError};
use crate::fetch::Fetcher;
use crate::manifest::UrlRef;

/// Lines examined before a list is rejected as too large.
pub const MAX_SCANNED_LINES: usize = 101;

/// Look for `manifest_url` in a disclosure list body.
///
/// Fails with [`ProvenanceError::ListTooLarge`] on reaching line
/// `MAX_SCANNED_LINES + 1` without a match; that line is not compared.
pub fn scan_disclosure_list(body: &[u8], manifest_url: &str) -> Result<(), ProvenanceError> {
    let needle = manifest_url.as_bytes();

    for (n, line) in body.split(|b| *b == b'\n').enumerate() {
        if n >= MAX_SCANNED_LINES {
            return Err(ProvenanceError::ListTooLarge);
        }
        if line == needle {
            return Ok(());
        }
    }

    Err(ProvenanceError::NotListed {
        manifest_url: manifest_url.to_string(),
    })
}

/// Check that `url_ref`'s disclosure list names `manifest_url`.
///
/// A reference without a `well_known` list passes without a request.
/// Fetch failures are returned unchanged; scan failures are tagged with `target`.
pub(crate) async fn verify(
    fetcher: &Fetcher,
    target: &str,
    url_ref: &UrlRef,
    manifest_url: &str,
) -> CrawlResult<()> {
    if !url_ref.is_verifiable() {
        // Unverifiable references are accepted as-is.
        debug!(reference = %target, url = %url_ref.url, "no .well-known list, skipping provenance check");
        return Ok(());
    }

    let body = fetcher.fetch(&url_ref.well_known).await?;

    scan_disclosure_list(&body, manifest_url).map_err(|source| CrawlError::Provenance {
        target: target.to_string(),
        source,
    })?;

    debug!(reference = %target, well_known = %url_ref.well_known, "provenance established");
    Ok(())
}
