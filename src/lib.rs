pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{Cli, Command};

pub use crate::adapters::{read_url_list, HttpCampaignClient, HttpSitemapFetcher};
pub use crate::config::IndexerConfig;
pub use crate::core::orchestrator::{DomainOrchestrator, OrchestratorSettings};
pub use crate::domain::model::{BatchOutcome, DomainReport, DomainStage, DomainStatus};
pub use crate::utils::error::{IndexerError, Result};
