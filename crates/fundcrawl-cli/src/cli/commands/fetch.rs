use fundcrawl_core::{CrawlResult, Crawler, Manifest};

use super::super::args::FetchArgs;
use super::{print_manifest, report_failure};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(crawler: &Crawler, args: FetchArgs) -> anyhow::Result<i32> {
    match fetch(crawler, &args).await {
        Ok(manifest) => {
            print_manifest(&manifest, args.json, !args.no_provenance)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

async fn fetch(crawler: &Crawler, args: &FetchArgs) -> CrawlResult<Manifest> {
    if !args.no_provenance {
        return crawler.fetch_manifest(&args.url).await;
    }

    let body = crawler.fetcher().fetch(&args.url).await?;
    crawler.parse_manifest(&body, &args.url, false).await
}
