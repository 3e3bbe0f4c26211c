use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const MAX_CAMPAIGN_NAME_LEN: usize = 120;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9 _\-\.\(\)\[\]]+").unwrap())
}

/// 移除奇怪字元並截斷長度，避免 API 拒絕活動名稱
pub fn sanitize_campaign_name(name: &str) -> String {
    let collapsed = whitespace_re().replace_all(name, " ");
    let cleaned = disallowed_re().replace_all(collapsed.trim(), "");
    cleaned.chars().take(MAX_CAMPAIGN_NAME_LEN).collect()
}

/// Keeps the first occurrence of every entry.
pub fn dedupe_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head)
    } else {
        text.to_string()
    }
}
