use crate::domain::model::{BatchOutcome, CampaignRequest};
use crate::domain::ports::CampaignApi;

pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// Splits `urls` into contiguous campaigns of at most `batch_size` URLs.
///
/// A single batch keeps `base_name`; several batches are named
/// `{base_name}__part1`, `{base_name}__part2`, ...
pub fn plan_batches(base_name: &str, days: u32, urls: &[String], batch_size: usize) -> Vec<CampaignRequest> {
    if urls.is_empty() {
        return Vec::new();
    }

    let chunks: Vec<&[String]> = urls.chunks(batch_size.max(1)).collect();
    let single = chunks.len() == 1;

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| CampaignRequest {
            name: if single {
                base_name.to_string()
            } else {
                format!("{}__part{}", base_name, index + 1)
            },
            days,
            urls: chunk.to_vec(),
        })
        .collect()
}

pub struct BatchSubmitter<'a, A: CampaignApi + ?Sized> {
    api: &'a A,
    batch_size: usize,
}

impl<'a, A: CampaignApi + ?Sized> BatchSubmitter<'a, A> {
    pub fn new(api: &'a A, batch_size: usize) -> Self {
        Self { api, batch_size }
    }

    /// 逐批送出；單一批次失敗不影響其他批次
    pub async fn submit(&self, base_name: &str, days: u32, urls: &[String]) -> Vec<BatchOutcome> {
        let batches = plan_batches(base_name, days, urls, self.batch_size);
        tracing::info!(
            "📤 Submitting {} URL(s) as {} campaign(s) named '{}'",
            urls.len(),
            batches.len(),
            base_name
        );

        let mut outcomes = Vec::with_capacity(batches.len());
        for request in batches {
            let outcome = match self.api.create_campaign(&request).await {
                Ok(response) => {
                    if response.is_success() {
                        tracing::info!("✅ Campaign '{}' created (HTTP {})", request.name, response.status);
                    } else {
                        tracing::warn!("❌ Campaign '{}' rejected (HTTP {})", request.name, response.status);
                    }
                    BatchOutcome {
                        name: request.name,
                        url_count: request.urls.len(),
                        status: Some(response.status),
                        body: Some(response.body),
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::error!("❌ Campaign '{}' failed: {}", request.name, e);
                    BatchOutcome {
                        name: request.name,
                        url_count: request.urls.len(),
                        status: None,
                        body: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingApi;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/p/{}", i)).collect()
    }

    #[test]
    fn test_plan_batches_splits_with_part_suffix() {
        let batches = plan_batches("base", 2, &urls(4500), 2000);

        let names: Vec<&str> = batches.iter().map(|b| b.name.as_str()).collect();
        let sizes: Vec<usize> = batches.iter().map(|b| b.urls.len()).collect();
        assert_eq!(names, vec!["base__part1", "base__part2", "base__part3"]);
        assert_eq!(sizes, vec![2000, 2000, 500]);
        assert!(batches.iter().all(|b| b.days == 2));

        // contiguous and order-preserving
        let rejoined: Vec<String> = batches.into_iter().flat_map(|b| b.urls).collect();
        assert_eq!(rejoined, urls(4500));
    }

    #[test]
    fn test_plan_batches_single_batch_keeps_base_name() {
        let batches = plan_batches("base", 1, &urls(2000), 2000);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].name, "base");
        assert_eq!(batches[0].urls.len(), 2000);
    }

    #[test]
    fn test_plan_batches_empty_input() {
        assert!(plan_batches("base", 1, &[], 2000).is_empty());
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_the_rest() {
        let api = RecordingApi::with_script(vec![None, Some(500), Some(200)]);
        let submitter = BatchSubmitter::new(&api, 2);

        let outcomes = submitter.submit("run", 3, &urls(5)).await;

        assert_eq!(api.requests().len(), 3);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].status, None);
        assert!(outcomes[0].error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(outcomes[1].status, Some(500));
        assert!(!outcomes[1].is_success());
        assert!(outcomes[2].is_success());
        assert_eq!(outcomes[2].name, "run__part3");
        assert_eq!(outcomes[2].url_count, 1);
    }
}
