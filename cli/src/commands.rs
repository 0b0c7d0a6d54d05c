pub mod audit;
pub mod classify;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use exposr_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT};

#[derive(Parser)]
#[command(name = "exposr", version)]
#[command(about = "Finds cloud resources that accept traffic from the public Internet.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output: -q hides banner and headers, -qq prints findings only
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a region for publicly reachable resources
    #[command(alias = "a")]
    Audit(AuditArgs),
    /// Classify address ranges as public or private
    #[command(alias = "c")]
    Classify {
        /// Ranges in CIDR notation, e.g. 10.0.0.0/8
        #[arg(required = true)]
        ranges: Vec<String>,
    },
}

#[derive(Args)]
pub struct AuditArgs {
    /// Region to audit (defaults to the AWS profile/environment region)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Maximum concurrent rule-set fetches
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Seconds before a single API call is abandoned
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,

    /// Seconds before the whole audit is cut short and reported as partial
    #[arg(long)]
    pub deadline: Option<u64>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let mut cfg = Config {
            no_banner: self.no_banner,
            quiet: self.quiet,
            ..Config::default()
        };

        if let Commands::Audit(args) = &self.command {
            cfg.region = args.region.clone();
            cfg.concurrency = args.concurrency.max(1);
            cfg.fetch_timeout = Duration::from_secs(args.fetch_timeout);
            cfg.deadline = args.deadline.map(Duration::from_secs);
        }

        cfg
    }
}
