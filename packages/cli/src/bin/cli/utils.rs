// ABOUTME: Shared formatting helpers for elbitat command output
// ABOUTME: Table presets, date parsing and platform lists

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use elbitat_core::Platform;

pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y %H:%M").to_string()
}

pub fn platform_list(platforms: &[Platform]) -> String {
    if platforms.is_empty() {
        return "-".to_string();
    }
    platforms
        .iter()
        .map(|p| p.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD` (midnight), read as UTC
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(format!(
        "Invalid date '{}': use YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339",
        value
    ))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': use YYYY-MM-DD", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            .and_utc();

        assert_eq!(parse_datetime("2025-06-01T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2025-06-01 09:30").unwrap(), expected);
        assert_eq!(
            parse_datetime("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
        );
        assert!(parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_platform_list() {
        assert_eq!(
            platform_list(&[Platform::Instagram, Platform::TikTok]),
            "Instagram, TikTok"
        );
        assert_eq!(platform_list(&[]), "-");
    }
}
