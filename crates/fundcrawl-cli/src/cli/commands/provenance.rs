use fundcrawl_core::{Crawler, UrlRef};

use super::super::args::ProvenanceArgs;
use super::report_failure;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(crawler: &Crawler, args: ProvenanceArgs) -> anyhow::Result<i32> {
    let url = args.url.unwrap_or_else(|| args.well_known.clone());
    let url_ref = UrlRef::new(url).with_well_known(args.well_known);

    match crawler.check_provenance(&url_ref, &args.manifest_url).await {
        Ok(()) => {
            println!("OK {} lists {}", url_ref.well_known, args.manifest_url);
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}
