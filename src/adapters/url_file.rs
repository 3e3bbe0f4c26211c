//! URL-list ingestion: the alternative to sitemap discovery.
//!
//! Every cell of a CSV file (or every line of a text file) is scanned for
//! `http(s)://` substrings; the result is deduplicated in first-seen order.

use crate::utils::error::Result;
use crate::utils::text::dedupe_preserving_order;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

fn url_like_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)https?://[^\s<>"']+"#).unwrap())
}

pub fn read_url_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let urls = if is_csv {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record?;
            cells.extend(record.iter().flat_map(extract_urls));
        }
        cells
    } else {
        let content = std::fs::read_to_string(path)?;
        extract_urls(&content)
    };

    let urls = dedupe_preserving_order(urls);
    tracing::info!("📄 Read {} unique URL(s) from {}", urls.len(), path.display());
    Ok(urls)
}

/// Pulls every valid http/https URL out of free text.
pub fn extract_urls(text: &str) -> Vec<String> {
    url_like_re()
        .find_iter(text.trim())
        .map(|m| m.as_str())
        .filter(|candidate| {
            Url::parse(candidate)
                .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
                .unwrap_or(false)
        })
        .map(String::from)
        .collect()
}
