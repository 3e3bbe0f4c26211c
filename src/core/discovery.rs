use crate::core::host::candidate_sitemap_urls;
use crate::core::parser::parse_sitemap;
use crate::domain::ports::SitemapSource;
use crate::utils::text::dedupe_preserving_order;

/// Finds the sitemap(s) a crawl of `host` should start from.
///
/// Returns an empty list when no conventional location answers with usable content.
pub async fn discover_entry_points<S>(source: &S, host: &str) -> Vec<String>
where
    S: SitemapSource + ?Sized,
{
    probe_candidates(source, &candidate_sitemap_urls(host)).await
}

/// 依序探測候選網址，第一個有內容的就停止
///
/// An index yields itself plus its immediate children; a urlset yields only itself.
pub async fn probe_candidates<S>(source: &S, candidates: &[String]) -> Vec<String>
where
    S: SitemapSource + ?Sized,
{
    for url in candidates {
        let Some(data) = source.fetch(url).await else {
            continue;
        };
        let parsed = parse_sitemap(&data);

        if !parsed.child_sitemaps.is_empty() {
            tracing::info!(
                "🗺️ Found sitemap index {} with {} child sitemap(s)",
                url,
                parsed.child_sitemaps.len()
            );
            let entry_points = std::iter::once(url.clone()).chain(parsed.child_sitemaps);
            return dedupe_preserving_order(entry_points);
        }

        if !parsed.page_urls.is_empty() {
            tracing::info!("🗺️ Found urlset {} with {} URL(s)", url, parsed.page_urls.len());
            return vec![url.clone()];
        }

        tracing::debug!("Candidate {} has no usable sitemap content", url);
    }

    Vec::new()
}
