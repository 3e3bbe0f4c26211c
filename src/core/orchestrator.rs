//! One crawl-and-submit pipeline per domain, many domains at once.
//!
//! `Normalize -> Discover -> Crawl -> Submit -> Completed`, with any stage
//! able to end the run as `Failed`. Failures are written into the
//! `DomainReport`; nothing escapes to sibling pipelines. Pipelines share no
//! mutable state: each crawl owns its visited sets and frontier.

use crate::config::IndexerConfig;
use crate::core::crawler::{CrawlOptions, SitemapCrawler};
use crate::core::discovery::discover_entry_points;
use crate::core::host::normalize_host;
use crate::core::submitter::BatchSubmitter;
use crate::domain::model::{
    BatchOutcome, CrawlResult, CrawlSummary, DomainReport, DomainStage, DomainStatus,
};
use crate::domain::ports::{CampaignApi, SitemapSource};
use crate::utils::error::{IndexerError, Result};
use crate::utils::text::{dedupe_preserving_order, sanitize_campaign_name};
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::Instrument;

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub crawl: CrawlOptions,
    pub batch_size: usize,
    pub max_concurrent_domains: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            crawl: CrawlOptions::default(),
            batch_size: crate::core::submitter::DEFAULT_BATCH_SIZE,
            max_concurrent_domains: 3,
        }
    }
}

impl From<&IndexerConfig> for OrchestratorSettings {
    fn from(config: &IndexerConfig) -> Self {
        Self {
            crawl: CrawlOptions {
                max_depth: config.crawler.max_depth,
                level_concurrency: config.crawler.level_concurrency,
            },
            batch_size: config.api.batch_size,
            max_concurrent_domains: config.orchestrator.max_concurrent_domains,
        }
    }
}

/// Discovered sitemap tree of one host, flattened.
#[derive(Debug, Clone)]
pub struct DomainUrls {
    pub host: String,
    pub entry_points: Vec<String>,
    pub crawl: CrawlResult,
}

pub struct DomainOrchestrator<S: SitemapSource, A: CampaignApi> {
    source: S,
    api: A,
    settings: OrchestratorSettings,
}

impl<S: SitemapSource, A: CampaignApi> DomainOrchestrator<S, A> {
    pub fn new(source: S, api: A, settings: OrchestratorSettings) -> Self {
        Self {
            source,
            api,
            settings,
        }
    }

    /// Normalize, discover and crawl without submitting anything.
    pub async fn collect_domain_urls(&self, raw_domain: &str) -> Result<DomainUrls> {
        let host = normalize_host(raw_domain).ok_or_else(|| {
            IndexerError::invalid_input(format!("'{}' is not a valid domain", raw_domain))
        })?;

        let entry_points = discover_entry_points(&self.source, &host).await;
        let crawl = if entry_points.is_empty() {
            CrawlResult::default()
        } else {
            SitemapCrawler::new(&self.source, self.settings.crawl)
                .crawl(&entry_points)
                .await
        };

        Ok(DomainUrls {
            host,
            entry_points,
            crawl,
        })
    }

    /// Submits an already collected URL list (e.g. from a file).
    pub async fn submit_urls(&self, base_name: &str, days: u32, urls: Vec<String>) -> Vec<BatchOutcome> {
        let urls = dedupe_preserving_order(urls);
        BatchSubmitter::new(&self.api, self.settings.batch_size)
            .submit(base_name, days, &urls)
            .await
    }

    /// Runs the full pipeline for one domain. Never fails; see the report status.
    pub async fn run_domain(&self, raw_domain: &str, campaign_base: &str, days: u32) -> DomainReport {
        let span = tracing::info_span!("domain", input = %raw_domain);
        self.run_domain_inner(raw_domain, campaign_base, days)
            .instrument(span)
            .await
    }

    async fn run_domain_inner(&self, raw_domain: &str, campaign_base: &str, days: u32) -> DomainReport {
        let mut report = DomainReport {
            input: raw_domain.to_string(),
            host: String::new(),
            entry_points: Vec::new(),
            url_count: 0,
            crawl: CrawlSummary::default(),
            campaigns: Vec::new(),
            status: DomainStatus::Completed,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        // Normalize
        let Some(host) = normalize_host(raw_domain) else {
            return finish(report, fail(DomainStage::Normalize, "invalid domain"));
        };
        report.host = host.clone();

        // Discover
        tracing::info!("🔍 Discovering sitemaps for {}", host);
        report.entry_points = discover_entry_points(&self.source, &host).await;
        if report.entry_points.is_empty() {
            return finish(
                report,
                fail(DomainStage::Discover, "no sitemap found (sitemap_index.xml / sitemap.xml)"),
            );
        }

        // Crawl
        let crawl = SitemapCrawler::new(&self.source, self.settings.crawl)
            .crawl(&report.entry_points)
            .await;
        report.url_count = crawl.page_urls.len();
        report.crawl = crawl.summary;
        if crawl.page_urls.is_empty() {
            return finish(report, fail(DomainStage::Crawl, "no URLs collected from sitemaps"));
        }

        // Submit
        let campaign_name = sanitize_campaign_name(&format!("{}_{}", campaign_base, host));
        report.campaigns = BatchSubmitter::new(&self.api, self.settings.batch_size)
            .submit(&campaign_name, days, &crawl.page_urls)
            .await;

        let status = if report.campaigns.iter().all(|c| c.status.is_none()) {
            let detail = report
                .campaigns
                .first()
                .and_then(|c| c.error.clone())
                .unwrap_or_default();
            fail(DomainStage::Submit, &format!("indexing API unreachable: {}", detail))
        } else {
            DomainStatus::Completed
        };
        finish(report, status)
    }

    /// 多網域並行處理，同時最多 `max_concurrent_domains` 個
    ///
    /// Reports come back in input order; admission order is not guaranteed.
    pub async fn run_domains(&self, domains: &[String], campaign_base: &str, days: u32) -> Vec<DomainReport> {
        let limiter = Semaphore::new(self.settings.max_concurrent_domains.max(1));
        tracing::info!(
            "🚀 Processing {} domain(s), at most {} at a time",
            domains.len(),
            self.settings.max_concurrent_domains
        );

        let runs = domains.iter().map(|domain| {
            let limiter = &limiter;
            async move {
                // the semaphore is never closed, so acquire cannot fail
                let _permit = limiter.acquire().await.ok();
                self.run_domain(domain, campaign_base, days).await
            }
        });

        let reports = join_all(runs).await;
        let completed = reports.iter().filter(|r| r.is_completed()).count();
        tracing::info!("🏁 {} of {} domain(s) completed", completed, reports.len());
        reports
    }
}

fn fail(stage: DomainStage, reason: &str) -> DomainStatus {
    DomainStatus::Failed {
        stage,
        reason: reason.to_string(),
    }
}

fn finish(mut report: DomainReport, status: DomainStatus) -> DomainReport {
    match &status {
        DomainStatus::Completed => tracing::info!(
            "✅ {} completed: {} URL(s), {} campaign(s)",
            report.host,
            report.url_count,
            report.campaigns.len()
        ),
        DomainStatus::Failed { stage, reason } => {
            tracing::warn!("❌ {} failed at {}: {}", report.input, stage, reason)
        }
    }
    report.status = status;
    report.finished_at = Utc::now();
    report
}
