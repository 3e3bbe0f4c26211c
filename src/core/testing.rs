use crate::domain::model::{ApiResponse, CampaignRequest};
use crate::domain::ports::{CampaignApi, SitemapSource};
use crate::utils::error::{IndexerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory sitemap server; unknown URLs behave like a 404.
#[derive(Default)]
pub struct MemorySource {
    documents: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

#[async_trait]
impl SitemapSource for MemorySource {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.documents.get(url).cloned()
    }
}

/// Records every request and answers with a scripted status per call.
#[derive(Default)]
pub struct RecordingApi {
    requests: Mutex<Vec<CampaignRequest>>,
    /// Consumed front to back; `None` simulates a transport failure.
    script: Mutex<Vec<Option<u16>>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Vec<Option<u16>>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(script),
        }
    }

    pub fn requests(&self) -> Vec<CampaignRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CampaignApi for RecordingApi {
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Some(200)
            } else {
                script.remove(0)
            }
        };

        match next {
            Some(status) => Ok(ApiResponse {
                status,
                body: serde_json::json!({ "campaign": request.name }),
            }),
            None => Err(IndexerError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}
