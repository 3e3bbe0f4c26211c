use crate::config::IndexerConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "sitemap-indexer")]
#[command(about = "Crawl sitemap trees and submit page URLs to an indexing service in batches")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print results as JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Override crawler.max_depth
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Override api.batch_size
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    /// Override orchestrator.max_concurrent_domains
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Discover and crawl a domain's sitemaps, printing the collected URLs
    Crawl {
        /// Domain or URL, e.g. example.com
        domain: String,
    },

    /// Crawl one domain and submit its URLs as campaigns
    Index {
        domain: String,

        /// Campaign duration in days (1-365)
        #[arg(long)]
        days: String,

        /// Base campaign name
        #[arg(long)]
        campaign: Option<String>,
    },

    /// Crawl and submit many domains concurrently
    IndexDomains {
        /// Domains separated by spaces, commas or newlines
        #[arg(required = true)]
        domains: Vec<String>,

        #[arg(long, default_value = "1")]
        days: String,

        #[arg(long)]
        campaign: Option<String>,
    },

    /// Submit the URLs found in a CSV or text file
    SubmitFile {
        path: String,

        #[arg(long)]
        days: String,

        #[arg(long)]
        campaign: Option<String>,
    },
}

impl Cli {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut IndexerConfig) {
        if let Some(depth) = self.max_depth {
            config.crawler.max_depth = depth;
        }
        if let Some(size) = self.batch_size {
            config.api.batch_size = size;
        }
        if let Some(concurrency) = self.concurrency {
            config.orchestrator.max_concurrent_domains = concurrency;
        }
    }

    pub fn needs_api(&self) -> bool {
        !matches!(self.command, Command::Crawl { .. })
    }
}
