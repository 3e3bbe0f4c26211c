use crate::utils::error::{IndexerError, Result};
use url::Url;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 365;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(IndexerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(IndexerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(IndexerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(IndexerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IndexerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(IndexerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 驗證活動天數 (1..=365)
pub fn validate_days(days: u32) -> Result<u32> {
    if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
        return Err(IndexerError::invalid_input(format!(
            "day count must be between {} and {}, got {}",
            MIN_DAYS, MAX_DAYS, days
        )));
    }
    Ok(days)
}

/// Parses a user-typed day count. Only plain 1–3 digit integers are accepted.
pub fn parse_days(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > 3 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IndexerError::invalid_input(format!(
            "'{}' is not a valid day count (expected an integer like 1, 3, 7)",
            raw
        )));
    }
    let days: u32 = raw
        .parse()
        .map_err(|_| IndexerError::invalid_input(format!("'{}' is not a number", raw)))?;
    validate_days(days)
}
