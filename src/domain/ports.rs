use crate::domain::model::{ApiResponse, CampaignRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything that can hand back the raw bytes of a sitemap URL.
///
/// Failures are never errors here: a missing, unreachable or timed-out
/// resource is reported as `None` so one node cannot abort a crawl.
#[async_trait]
pub trait SitemapSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// The external indexing service.
///
/// `Err` means the request never produced an HTTP status; any status,
/// including non-2xx, comes back as `Ok`.
#[async_trait]
pub trait CampaignApi: Send + Sync {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: SitemapSource + ?Sized> SitemapSource for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<T: CampaignApi + ?Sized> CampaignApi for std::sync::Arc<T> {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<ApiResponse> {
        (**self).create_campaign(request).await
    }
}
