//! Funding manifest crawler core.
//!
//! Fetches a `funding.json` manifest, validates it through a pluggable
//! schema validator, and establishes the provenance of every URL it claims
//! by checking the `.well-known` disclosure list published on that URL's
//! own domain.
//!
//! - Retrying HTTP fetch engine with per-host connection caps and a body size cap
//! - Manifest decode / validate orchestration
//! - Line-based provenance verification
//!
//! # Quick Start
//!
//! ```no_run
//! use fundcrawl_core::{CrawlConfig, Crawler, V1Schema};
//!
//! # async fn example() -> Result<(), fundcrawl_core::CrawlError> {
//! let crawler = Crawler::new(CrawlConfig::from_env(), V1Schema)?;
//!
//! let manifest = crawler
//!     .fetch_manifest("https://a.example/funding.json")
//!     .await?;
//! println!("{} lists {} projects", manifest.entity.name, manifest.projects.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `FUNDCRAWL_USER_AGENT` | `User-Agent` header (default: `fundcrawl/<version>`) |
//! | `FUNDCRAWL_MAX_HOST_CONNS` | Connections per host (default: 4) |
//! | `FUNDCRAWL_REQ_TIMEOUT` | Per-request timeout (default: `10s`) |
//! | `FUNDCRAWL_ATTEMPTS` | Tries per fetch (default: 3) |
//! | `FUNDCRAWL_MAX_BYTES` | Response body cap in bytes (default: 1 MiB) |

pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod provenance;
pub mod schema;

// Re-export main types
pub use config::{CrawlConfig, DEFAULT_USER_AGENT};
pub use crawler::Crawler;
pub use error::{CrawlError, CrawlResult, ProvenanceError};
pub use fetch::retry::AttemptOutcome;
pub use fetch::Fetcher;
pub use manifest::{Channel, Entity, Funding, HistoryEntry, Manifest, Plan, Project, UrlRef};
pub use provenance::{scan_disclosure_list, MAX_SCANNED_LINES};
pub use schema::{AcceptAll, SchemaError, SchemaValidator, V1Schema, V1_VERSION, WELL_KNOWN_SUFFIX};
