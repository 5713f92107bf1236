// ABOUTME: Shared display helpers for Storyloom
// ABOUTME: Truncation and backend timestamp formatting used by listings

use chrono::{DateTime, NaiveDateTime};

/// Truncate a string to at most `max_len` characters, appending `...` when cut
pub fn truncate(value: &str, max_len: usize) -> String {
    if value.chars().count() <= max_len {
        return value.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut truncated: String = value.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Format a backend timestamp (`2024-05-01 10:00:00.000Z` or RFC 3339) as a date.
/// Unparseable values are returned unchanged.
pub fn format_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.fZ") {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer description", 10), "a longe...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01 10:00:00.000Z"), "2024-05-01");
        assert_eq!(format_date("2024-05-01T10:00:00Z"), "2024-05-01");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
