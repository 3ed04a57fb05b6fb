use fundcrawl_core::{CrawlConfig, Crawler, V1Schema};

use super::super::args::*;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.crawl.resolve()?;

    match cli.cmd {
        Command::Fetch(args) => super::fetch::run(&crawler(config)?, args).await,
        Command::Parse(args) => super::parse::run(&crawler(config)?, args).await,
        Command::Provenance(args) => super::provenance::run(&crawler(config)?, args).await,
        Command::Config => {
            print!("{}", config.to_yaml()?);
            Ok(EXIT_SUCCESS)
        }
    }
}

fn crawler(config: CrawlConfig) -> anyhow::Result<Crawler> {
    Ok(Crawler::new(config, V1Schema)?)
}
