use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best-effort extraction from one sitemap document.
///
/// `root` is the local name of the document element, `None` when the bytes
/// were not well-formed XML. Both lists may be empty either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSitemap {
    pub root: Option<String>,
    pub child_sitemaps: Vec<String>,
    pub page_urls: Vec<String>,
}

impl ParsedSitemap {
    pub fn is_well_formed(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.child_sitemaps.is_empty() && self.page_urls.is_empty()
    }
}

/// One campaign-creation request, built from one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRequest {
    #[serde(rename = "CampaignName")]
    pub name: String,
    #[serde(rename = "NumberOfDay")]
    pub days: u32,
    #[serde(rename = "Urls")]
    pub urls: Vec<String>,
}

/// Raw reply of the indexing API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 每個批次的送出結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub name: String,
    pub url_count: usize,
    /// `None` when the request never got an HTTP status (transport failure).
    pub status: Option<u16>,
    pub body: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }

    pub fn detail(&self) -> String {
        match (&self.body, &self.error) {
            (Some(body), _) => body.to_string(),
            (None, Some(error)) => error.clone(),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStage {
    Normalize,
    Discover,
    Crawl,
    Submit,
}

impl std::fmt::Display for DomainStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DomainStage::Normalize => "normalize",
            DomainStage::Discover => "discover",
            DomainStage::Crawl => "crawl",
            DomainStage::Submit => "submit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DomainStatus {
    Completed,
    Failed { stage: DomainStage, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub sitemaps_visited: usize,
    pub levels_completed: usize,
    /// The depth bound stopped traversal while references were still pending.
    pub truncated: bool,
    /// Well-formed documents that listed neither sitemaps nor pages.
    pub empty_documents: usize,
}

/// Ordered, deduplicated crawl output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pub page_urls: Vec<String>,
    pub summary: CrawlSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub input: String,
    pub host: String,
    pub entry_points: Vec<String>,
    pub url_count: usize,
    pub crawl: CrawlSummary,
    pub campaigns: Vec<BatchOutcome>,
    pub status: DomainStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DomainReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, DomainStatus::Completed)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            DomainStatus::Completed => None,
            DomainStatus::Failed { reason, .. } => Some(reason),
        }
    }

    pub fn failed_stage(&self) -> Option<DomainStage> {
        match &self.status {
            DomainStatus::Completed => None,
            DomainStatus::Failed { stage, .. } => Some(*stage),
        }
    }
}
