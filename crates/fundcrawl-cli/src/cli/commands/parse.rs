use anyhow::Context;
use fundcrawl_core::Crawler;

use super::super::args::ParseArgs;
use super::{print_manifest, report_failure};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(crawler: &Crawler, args: ParseArgs) -> anyhow::Result<i32> {
    let body = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    match crawler
        .parse_manifest(&body, &args.url, args.check_provenance)
        .await
    {
        Ok(manifest) => {
            print_manifest(&manifest, args.json, args.check_provenance)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}
