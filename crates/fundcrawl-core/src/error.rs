//! Error types for the crawl pipeline.

use crate::schema::SchemaError;

/// Crawl errors.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Transport failure: DNS, connect, timeout or a request that could not be built.
    #[error("GET {url}: {message}")]
    Network { url: String, message: String },

    /// The response body could not be read to completion.
    #[error("GET {url}: failed to read response body: {message}")]
    BodyRead { url: String, message: String },

    /// The server answered with something other than 200.
    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    /// The body is not a decodable manifest.
    #[error("error parsing JSON body: {message}")]
    Decode { message: String },

    /// The schema validator rejected the manifest.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A referenced URL failed its provenance check.
    #[error("provenance check failed for {target}: {source}")]
    Provenance {
        target: String,
        #[source]
        source: ProvenanceError,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Why a disclosure list did not vouch for a manifest URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvenanceError {
    #[error("manifest URL {manifest_url} was not found in the .well-known list")]
    NotListed { manifest_url: String },

    #[error("too many lines in the .well-known list")]
    ListTooLarge,
}

impl CrawlError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,

            // Content problems
            Self::Decode { .. } => 2,
            Self::Schema(_) => 2,

            // Trust
            Self::Provenance { .. } => 3,

            // Server said no
            Self::Status { .. } => 4,

            // Network/transient
            Self::Network { .. } => 5,
            Self::BodyRead { .. } => 5,
        }
    }

    /// Whether another attempt of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::BodyRead { .. })
    }

    /// The manifest handed back alongside the error, if any.
    ///
    /// Only schema failures carry one: it is whatever the validator returned.
    pub fn manifest(&self) -> Option<&crate::manifest::Manifest> {
        match self {
            Self::Schema(e) => Some(e.manifest.as_ref()),
            _ => None,
        }
    }
}

/// Result type for crawl operations.
pub type CrawlResult<T> = Result<T, CrawlError>;
