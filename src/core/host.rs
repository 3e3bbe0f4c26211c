use crate::utils::text::dedupe_preserving_order;
use url::Url;

/// 將使用者輸入正規化為主機名稱 (無 scheme、port、path)
///
/// Returns `None` when the input is empty or has no parseable host.
pub fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let lowered = raw.to_ascii_lowercase();
    let with_scheme = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&with_scheme).ok()?;
    // host_str() never includes the port
    let host = url.host_str()?.trim().to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Ordered probe list: bare host before `www.`, https before http,
/// `sitemap_index.xml` before `sitemap.xml`.
pub fn candidate_sitemap_urls(host: &str) -> Vec<String> {
    let mut hosts = vec![host.to_string()];
    if !host.starts_with("www.") {
        hosts.push(format!("www.{}", host));
    }

    hosts
        .iter()
        .flat_map(|h| {
            [
                format!("https://{}/sitemap_index.xml", h),
                format!("https://{}/sitemap.xml", h),
                format!("http://{}/sitemap_index.xml", h),
                format!("http://{}/sitemap.xml", h),
            ]
        })
        .collect()
}

/// Splits free-form domain tokens on commas, newlines and whitespace.
pub fn parse_domain_list<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let pieces = tokens
        .iter()
        .flat_map(|token| {
            token
                .as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    dedupe_preserving_order(pieces)
}
