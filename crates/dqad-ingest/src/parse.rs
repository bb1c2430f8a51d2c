//! Lenient cell parsing. Anything that does not parse becomes `None`.

use chrono::{NaiveDate, NaiveDateTime};

/// Trim whitespace and a stray byte-order mark; blank cells are absent.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Header names compare case-insensitively with surrounding noise removed.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_ascii_lowercase()
}

/// Parse an amount such as `250.00` or `1,250.50`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|ch| *ch != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Parse `YYYY-MM-DD`, or the date part of an ISO 8601 datetime.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|datetime| datetime.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(normalize_cell("  "), None);
        assert_eq!(normalize_cell("\u{feff}claim_id"), Some("claim_id".to_string()));
        assert_eq!(normalize_cell(" PAID "), Some("PAID".to_string()));
    }

    #[test]
    fn amounts() {
        assert_eq!(parse_amount("250.00"), Some(250.0));
        assert_eq!(parse_amount("-250"), Some(-250.0));
        assert_eq!(parse_amount("1,250.50"), Some(1250.5));
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("2024-03-15T08:30:00"), expected);
        assert_eq!(parse_date("2024-03-15 08:30:00.123"), expected);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("03/15/2024"), None);
        assert_eq!(parse_date("not a date"), None);
    }
}
