use async_trait::async_trait;
use httpmock::prelude::*;
use sitemap_indexer::config::ApiConfig;
use sitemap_indexer::domain::ports::SitemapSource;
use sitemap_indexer::{DomainOrchestrator, DomainStage, HttpCampaignClient, OrchestratorSettings};
use std::collections::HashMap;

/// Serves fixed sitemap documents keyed by URL.
struct StaticSitemaps(HashMap<String, String>);

impl StaticSitemaps {
    fn new(entries: &[(&str, String)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(url, body)| (url.to_string(), body.clone()))
                .collect(),
        )
    }
}

#[async_trait]
impl SitemapSource for StaticSitemaps {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        self.0.get(url).map(|body| body.clone().into_bytes())
    }
}

fn urlset(host: &str, n: usize) -> String {
    let entries: String = (0..n)
        .map(|i| format!("<url><loc>https://{}/page-{}</loc></url>", host, i))
        .collect();
    format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

#[tokio::test]
async fn test_multi_domain_run_submits_per_domain_campaigns() {
    let server = MockServer::start_async().await;
    let alpha_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/campaign/create")
            .header("ApiKey", "integration-key")
            .body_contains("\"CampaignName\":\"nightly_alpha.test\"");
        then.status(200).json_body(serde_json::json!({ "success": true }));
    });
    let beta_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/campaign/create")
            .body_contains("\"CampaignName\":\"nightly_beta.test__part");
        then.status(200).json_body(serde_json::json!({ "success": true }));
    });

    let source = StaticSitemaps::new(&[
        ("https://alpha.test/sitemap.xml", urlset("alpha.test", 2)),
        (
            "https://www.beta.test/sitemap_index.xml",
            r#"<sitemapindex><sitemap><loc>https://www.beta.test/posts.xml</loc></sitemap></sitemapindex>"#
                .to_string(),
        ),
        ("https://www.beta.test/posts.xml", urlset("beta.test", 5)),
    ]);
    let api = HttpCampaignClient::new(&ApiConfig {
        endpoint: server.url("/campaign/create"),
        api_key: "integration-key".to_string(),
        ..ApiConfig::default()
    })
    .unwrap();
    let settings = OrchestratorSettings {
        batch_size: 2,
        max_concurrent_domains: 2,
        ..OrchestratorSettings::default()
    };
    let orchestrator = DomainOrchestrator::new(source, api, settings);

    let domains = vec![
        "https://Alpha.test/".to_string(),
        "gone.test".to_string(),
        "beta.test".to_string(),
    ];
    let reports = orchestrator.run_domains(&domains, "nightly", 2).await;

    assert_eq!(reports.len(), 3);

    assert!(reports[0].is_completed(), "{:?}", reports[0].status);
    assert_eq!(reports[0].url_count, 2);
    assert_eq!(reports[0].campaigns.len(), 1);

    assert_eq!(reports[1].failed_stage(), Some(DomainStage::Discover));
    assert!(reports[1].campaigns.is_empty());

    assert!(reports[2].is_completed(), "{:?}", reports[2].status);
    assert_eq!(reports[2].entry_points.len(), 2);
    assert_eq!(reports[2].url_count, 5);
    let names: Vec<&str> = reports[2].campaigns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["nightly_beta.test__part1", "nightly_beta.test__part2", "nightly_beta.test__part3"]
    );

    alpha_mock.assert_hits(1);
    beta_mock.assert_hits(3);
    assert!(reports.iter().all(|r| r.finished_at >= r.started_at));
}

#[tokio::test]
async fn test_rejected_submission_is_reported_not_fatal() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/campaign/create");
        then.status(401).json_body(serde_json::json!({ "message": "invalid key" }));
    });

    let source = StaticSitemaps::new(&[("https://solo.test/sitemap.xml", urlset("solo.test", 2))]);
    let api = HttpCampaignClient::new(&ApiConfig {
        endpoint: server.url("/campaign/create"),
        api_key: "wrong".to_string(),
        ..ApiConfig::default()
    })
    .unwrap();
    let orchestrator = DomainOrchestrator::new(source, api, OrchestratorSettings::default());

    let report = orchestrator.run_domain("solo.test", "base", 1).await;

    assert!(report.is_completed());
    assert_eq!(report.campaigns.len(), 1);
    assert_eq!(report.campaigns[0].status, Some(401));
    assert!(report.campaigns[0].detail().contains("invalid key"));
}
