pub mod crawler;
pub mod discovery;
pub mod host;
pub mod orchestrator;
pub mod parser;
pub mod submitter;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{BatchOutcome, CrawlResult, DomainReport, ParsedSitemap};
pub use crate::domain::ports::{CampaignApi, SitemapSource};
pub use crate::utils::error::Result;
