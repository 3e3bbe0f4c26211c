use crate::config::{ApiConfig, CrawlerConfig};
use crate::domain::model::{ApiResponse, CampaignRequest};
use crate::domain::ports::{CampaignApi, SitemapSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::io::Read;

/// Sitemap fetcher over HTTP. Every failure degrades to `None`.
#[derive(Debug, Clone)]
pub struct HttpSitemapFetcher {
    client: Client,
}

impl HttpSitemapFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SitemapSource for HttpSitemapFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        tracing::debug!("Fetching sitemap: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Fetch error {}: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Sitemap {} answered HTTP {}", url, status);
            return None;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                return None;
            }
        };

        if body.is_empty() {
            return None;
        }

        if url.to_ascii_lowercase().ends_with(".gz") || content_type.contains("gzip") {
            return Some(maybe_gunzip(url, body));
        }

        Some(body)
    }
}

/// 解壓失敗時回傳原始內容，部分伺服器會標錯 content-type
fn maybe_gunzip(url: &str, body: Vec<u8>) -> Vec<u8> {
    let mut decoded = Vec::new();
    match GzDecoder::new(body.as_slice()).read_to_end(&mut decoded) {
        Ok(_) => decoded,
        Err(e) => {
            tracing::debug!("{} is not gzip despite its label ({}), using raw bytes", url, e);
            body
        }
    }
}

/// Client for the campaign-creation endpoint.
#[derive(Debug, Clone)]
pub struct HttpCampaignClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpCampaignClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CampaignApi for HttpCampaignClient {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<ApiResponse> {
        tracing::debug!(
            "Creating campaign '{}' with {} URLs for {} day(s)",
            request.name,
            request.urls.len(),
            request.days
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("ApiKey", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        // status already received; keep it even if the body cannot be read
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Campaign '{}' reply body unreadable (HTTP {}): {}", request.name, status, e);
                String::new()
            }
        };
        let body = serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "raw": text }));

        tracing::debug!("Campaign '{}' answered HTTP {}", request.name, status);
        Ok(ApiResponse { status, body })
    }
}
