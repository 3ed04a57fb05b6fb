//! Exit codes for the `fundcrawl` binary.
//! Pipeline failures exit with `CrawlError::exit_code`; these names are the public contract.

pub const EXIT_SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 1; // Bad flags, config file or environment
pub const INVALID_MANIFEST: i32 = 2; // Did not decode or failed schema validation
pub const PROVENANCE_FAILED: i32 = 3; // A .well-known list did not vouch for the manifest
pub const HTTP_STATUS: i32 = 4; // Server answered with a non-200 status
pub const NETWORK_ERROR: i32 = 5; // Transport or body read failure after all attempts
