pub mod dispatch;
pub mod fetch;
pub mod parse;
pub mod provenance;

pub use dispatch::dispatch;

use fundcrawl_core::{CrawlError, Manifest};

use crate::exit_codes::{
    CONFIG_ERROR, HTTP_STATUS, INVALID_MANIFEST, NETWORK_ERROR, PROVENANCE_FAILED,
};

/// Print a pipeline failure and return its exit code.
pub(crate) fn report_failure(err: &CrawlError) -> i32 {
    let code = err.exit_code();
    let kind = match code {
        CONFIG_ERROR => "config",
        INVALID_MANIFEST => "invalid manifest",
        PROVENANCE_FAILED => "provenance",
        HTTP_STATUS => "http",
        NETWORK_ERROR => "network",
        _ => "error",
    };

    match err {
        CrawlError::Schema(schema) => {
            eprintln!("error ({kind}): manifest failed schema validation");
            for violation in &schema.violations {
                eprintln!("  - {}", violation);
            }
        }
        _ => eprintln!("error ({kind}): {}", err),
    }
    code
}

pub(crate) fn print_manifest(
    manifest: &Manifest,
    json: bool,
    provenance_checked: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(manifest)?);
        return Ok(());
    }

    println!("OK {}", manifest.url);
    println!(
        "entity: {} ({}, {})",
        manifest.entity.name, manifest.entity.kind, manifest.entity.webpage_url.url
    );
    println!("projects: {}", manifest.projects.len());
    for project in &manifest.projects {
        println!(
            "  {:<20} {:<30} {}",
            project.guid, project.name, project.repository_url.url
        );
    }

    let verifiable = manifest
        .provenance_targets()
        .into_iter()
        .filter(|(_, r)| r.is_verifiable())
        .count();
    if provenance_checked {
        println!("provenance: {} URL(s) verified", verifiable);
    } else {
        println!("provenance: not checked");
    }
    Ok(())
}
