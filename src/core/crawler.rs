//! Level-by-level traversal of a sitemap-index tree.
//!
//! References are marked visited when dequeued, before their fetch, so a
//! child listed by several parents is fetched at most once. Each level is a
//! barrier: the next level is built only after every fetch of the current
//! one has resolved. The depth bound keeps cyclic or endless index chains
//! finite; whatever was collected before the bound is still returned.

use crate::core::parser::parse_sitemap;
use crate::domain::model::{CrawlResult, CrawlSummary};
use crate::domain::ports::SitemapSource;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

pub const DEFAULT_MAX_DEPTH: usize = 6;

#[derive(Debug, Clone, Copy)]
pub struct CrawlOptions {
    pub max_depth: usize,
    pub level_concurrency: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            level_concurrency: 8,
        }
    }
}

pub struct SitemapCrawler<'a, S: SitemapSource + ?Sized> {
    source: &'a S,
    options: CrawlOptions,
}

impl<'a, S: SitemapSource + ?Sized> SitemapCrawler<'a, S> {
    pub fn new(source: &'a S, options: CrawlOptions) -> Self {
        Self { source, options }
    }

    pub async fn crawl(&self, entry_points: &[String]) -> CrawlResult {
        let mut visited_sitemaps: HashSet<String> = HashSet::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut page_urls = Vec::new();
        let mut summary = CrawlSummary::default();

        let mut frontier: Vec<String> = entry_points.to_vec();
        let mut depth = 0;

        while !frontier.is_empty() && depth < self.options.max_depth {
            // 出列即標記為已造訪
            let level: Vec<String> = frontier
                .drain(..)
                .filter(|url| visited_sitemaps.insert(url.clone()))
                .collect();

            tracing::debug!("Crawl level {}: {} sitemap(s)", depth, level.len());

            // buffered() keeps level order, so first-seen order is deterministic
            let documents: Vec<(String, Option<Vec<u8>>)> = stream::iter(level)
                .map(|url| async move {
                    let data = self.source.fetch(&url).await;
                    (url, data)
                })
                .buffered(self.options.level_concurrency.max(1))
                .collect()
                .await;

            let mut next_level = Vec::new();
            for (url, data) in documents {
                summary.sitemaps_visited += 1;
                let Some(data) = data else {
                    continue;
                };

                let parsed = parse_sitemap(&data);
                if parsed.is_well_formed() && parsed.is_empty() {
                    tracing::info!("Sitemap {} is valid but lists nothing", url);
                    summary.empty_documents += 1;
                    continue;
                }

                for page in parsed.page_urls {
                    if seen_urls.insert(page.clone()) {
                        page_urls.push(page);
                    }
                }

                next_level.extend(
                    parsed
                        .child_sitemaps
                        .into_iter()
                        .filter(|child| !visited_sitemaps.contains(child)),
                );
            }

            frontier = next_level;
            depth += 1;
            summary.levels_completed = depth;
        }

        if !frontier.is_empty() {
            summary.truncated = true;
            tracing::warn!(
                "Depth limit {} reached with {} sitemap reference(s) pending; returning partial result",
                self.options.max_depth,
                frontier.len()
            );
        }

        tracing::info!(
            "Collected {} URL(s) from {} sitemap(s)",
            page_urls.len(),
            summary.sitemaps_visited
        );

        CrawlResult { page_urls, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemorySource;

    fn urlset(urls: &[&str]) -> String {
        let entries: String = urls
            .iter()
            .map(|u| format!("<url><loc>{}</loc></url>", u))
            .collect();
        format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )
    }

    fn index(children: &[&str]) -> String {
        let entries: String = children
            .iter()
            .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
            .collect();
        format!(
            r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
            entries
        )
    }

    fn entry(url: &str) -> Vec<String> {
        vec![url.to_string()]
    }

    #[tokio::test]
    async fn test_flattens_nested_index_tree() {
        let source = MemorySource::new()
            .with("https://s.test/root.xml", index(&["https://s.test/a.xml", "https://s.test/b.xml"]))
            .with("https://s.test/a.xml", index(&["https://s.test/a1.xml"]))
            .with("https://s.test/b.xml", urlset(&["https://s.test/p/b1", "https://s.test/p/b2"]))
            .with("https://s.test/a1.xml", urlset(&["https://s.test/p/a1"]));

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler.crawl(&entry("https://s.test/root.xml")).await;

        assert_eq!(
            result.page_urls,
            vec!["https://s.test/p/b1", "https://s.test/p/b2", "https://s.test/p/a1"]
        );
        assert_eq!(result.summary.sitemaps_visited, 4);
        assert_eq!(result.summary.levels_completed, 3);
        assert!(!result.summary.truncated);
    }

    #[tokio::test]
    async fn test_dedupes_urls_across_documents_in_first_seen_order() {
        let source = MemorySource::new()
            .with("https://s.test/one.xml", urlset(&["u1", "u2"]))
            .with("https://s.test/two.xml", urlset(&["u1", "u3"]));

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler
            .crawl(&["https://s.test/one.xml".to_string(), "https://s.test/two.xml".to_string()])
            .await;

        assert_eq!(result.page_urls, vec!["u1", "u2", "u3"]);
    }

    #[tokio::test]
    async fn test_shared_child_is_fetched_once() {
        let source = MemorySource::new()
            .with("https://s.test/root.xml", index(&["https://s.test/x.xml", "https://s.test/y.xml"]))
            .with("https://s.test/x.xml", index(&["https://s.test/shared.xml"]))
            .with("https://s.test/y.xml", index(&["https://s.test/shared.xml"]))
            .with("https://s.test/shared.xml", urlset(&["https://s.test/p/1"]));

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler.crawl(&entry("https://s.test/root.xml")).await;

        assert_eq!(result.page_urls, vec!["https://s.test/p/1"]);
        assert_eq!(source.request_count("https://s.test/shared.xml"), 1);
    }

    #[tokio::test]
    async fn test_cyclic_index_terminates() {
        let source = MemorySource::new()
            .with("https://s.test/a.xml", index(&["https://s.test/b.xml"]))
            .with("https://s.test/b.xml", r#"<urlset>
  <sitemap><loc>https://s.test/a.xml</loc></sitemap>
  <url><loc>https://s.test/p/b</loc></url>
</urlset>"#);

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler.crawl(&entry("https://s.test/a.xml")).await;

        assert_eq!(result.page_urls, vec!["https://s.test/p/b"]);
        assert_eq!(source.request_count("https://s.test/a.xml"), 1);
        assert_eq!(source.request_count("https://s.test/b.xml"), 1);
        assert!(!result.summary.truncated);
    }

    #[tokio::test]
    async fn test_depth_bound_returns_partial_result() {
        // an endless chain: level N points at level N+1
        let mut source = MemorySource::new();
        for n in 0..20 {
            source = source.with(
                &format!("https://s.test/level{}.xml", n),
                format!(
                    r#"<urlset>
  <url><loc>https://s.test/p/{n}</loc></url>
  <sitemap><loc>https://s.test/level{next}.xml</loc></sitemap>
</urlset>"#,
                    n = n,
                    next = n + 1
                ),
            );
        }

        let options = CrawlOptions {
            max_depth: 3,
            level_concurrency: 4,
        };
        let crawler = SitemapCrawler::new(&source, options);
        let result = crawler.crawl(&entry("https://s.test/level0.xml")).await;

        assert_eq!(
            result.page_urls,
            vec!["https://s.test/p/0", "https://s.test/p/1", "https://s.test/p/2"]
        );
        assert!(result.summary.truncated);
        assert_eq!(result.summary.levels_completed, 3);
        assert_eq!(source.request_count("https://s.test/level3.xml"), 0);
    }

    #[tokio::test]
    async fn test_failed_nodes_do_not_stop_siblings() {
        let source = MemorySource::new()
            .with("https://s.test/root.xml", index(&[
                "https://s.test/missing.xml",
                "https://s.test/broken.xml",
                "https://s.test/ok.xml",
            ]))
            .with("https://s.test/broken.xml", "<urlset><url><loc>https://s.test/p/x</loc>")
            .with("https://s.test/ok.xml", urlset(&["https://s.test/p/ok"]));

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler.crawl(&entry("https://s.test/root.xml")).await;

        assert_eq!(result.page_urls, vec!["https://s.test/p/ok"]);
        assert_eq!(result.summary.sitemaps_visited, 4);
    }

    #[tokio::test]
    async fn test_empty_urlset_is_counted_separately() {
        let source = MemorySource::new().with("https://s.test/empty.xml", "<urlset/>");

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler.crawl(&entry("https://s.test/empty.xml")).await;

        assert!(result.page_urls.is_empty());
        assert_eq!(result.summary.empty_documents, 1);
    }

    #[tokio::test]
    async fn test_duplicate_entry_points_are_processed_once() {
        let source = MemorySource::new().with("https://s.test/s.xml", urlset(&["https://s.test/p"]));

        let crawler = SitemapCrawler::new(&source, CrawlOptions::default());
        let result = crawler
            .crawl(&["https://s.test/s.xml".to_string(), "https://s.test/s.xml".to_string()])
            .await;

        assert_eq!(result.page_urls, vec!["https://s.test/p"]);
        assert_eq!(source.request_count("https://s.test/s.xml"), 1);
    }
}
