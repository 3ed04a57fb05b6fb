use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use fundcrawl_core::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "fundcrawl",
    version,
    about = "Fetch, validate and provenance-check funding.json manifests"
)]
pub struct Cli {
    #[command(flatten)]
    pub crawl: CrawlArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a manifest, validate it and verify its URLs
    Fetch(FetchArgs),
    /// Validate a manifest already on disk
    Parse(ParseArgs),
    /// Check one URL's .well-known list for a manifest URL
    Provenance(ProvenanceArgs),
    /// Print the effective configuration
    Config,
}

/// Fetch engine settings. Flags override the config file; without a file,
/// `FUNDCRAWL_*` environment variables are read.
#[derive(Args, Debug, Clone, Default)]
pub struct CrawlArgs {
    /// YAML config file
    #[arg(long, global = true, env = "FUNDCRAWL_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Connections per host
    #[arg(long, global = true)]
    pub max_host_conns: Option<usize>,

    /// Per-request timeout (e.g. 10s, 500ms)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Tries per fetch
    #[arg(long, global = true)]
    pub attempts: Option<u32>,

    /// Response body cap in bytes
    #[arg(long, global = true)]
    pub max_bytes: Option<u64>,
}

impl CrawlArgs {
    pub fn resolve(&self) -> anyhow::Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_yaml_file(path)?,
            None => CrawlConfig::from_env(),
        };

        if let Some(ua) = &self.user_agent {
            config = config.with_user_agent(ua.clone());
        }
        if let Some(conns) = self.max_host_conns {
            config = config.with_max_host_conns(conns);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_req_timeout(timeout);
        }
        if let Some(attempts) = self.attempts {
            config = config.with_attempts(attempts);
        }
        if let Some(max_bytes) = self.max_bytes {
            config = config.with_max_bytes(max_bytes);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Manifest URL
    pub url: String,

    /// Skip .well-known provenance checks
    #[arg(long)]
    pub no_provenance: bool,

    /// Print the validated manifest as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Manifest file
    pub file: PathBuf,

    /// URL the manifest was fetched from
    #[arg(long)]
    pub url: String,

    #[arg(long)]
    pub check_provenance: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProvenanceArgs {
    /// Manifest URL expected in the list
    pub manifest_url: String,

    /// .well-known list URL
    #[arg(long)]
    pub well_known: String,

    /// The URL the list vouches for (used in messages)
    #[arg(long)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_parses_with_global_overrides() {
        let cli = Cli::try_parse_from([
            "fundcrawl",
            "fetch",
            "https://a.example/funding.json",
            "--attempts",
            "5",
            "--timeout",
            "750ms",
            "--no-provenance",
        ])
        .expect("parse should succeed");

        assert_eq!(cli.crawl.attempts, Some(5));
        assert_eq!(cli.crawl.timeout, Some(Duration::from_millis(750)));
        match cli.cmd {
            Command::Fetch(args) => {
                assert_eq!(args.url, "https://a.example/funding.json");
                assert!(args.no_provenance);
                assert!(!args.json);
            }
            _ => panic!("expected Command::Fetch"),
        }
    }

    #[test]
    fn parse_requires_url() {
        assert!(Cli::try_parse_from(["fundcrawl", "parse", "funding.json"]).is_err());

        let cli = Cli::try_parse_from([
            "fundcrawl",
            "parse",
            "funding.json",
            "--url",
            "https://a.example/funding.json",
            "--check-provenance",
        ])
        .expect("parse should succeed");
        match cli.cmd {
            Command::Parse(args) => assert!(args.check_provenance),
            _ => panic!("expected Command::Parse"),
        }
    }

    #[test]
    fn bad_timeout_rejected() {
        assert!(Cli::try_parse_from(["fundcrawl", "config", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn resolve_applies_flags_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.yaml");
        std::fs::write(&path, "attempts: 9\nmax_bytes: 2048\n").unwrap();

        let args = CrawlArgs {
            config: Some(path),
            max_bytes: Some(512),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.attempts, 9);
        assert_eq!(config.max_bytes, 512);
    }

    #[test]
    fn resolve_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.yaml");
        std::fs::write(&path, "{}\n").unwrap();

        let args = CrawlArgs {
            config: Some(path),
            attempts: Some(0),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
