//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an ISO date (`2026-03-14`) as a long date (`March 14, 2026`).
///
/// Dates that fail to parse pass through unchanged; a typo in a content
/// document should not take the page down.
///
/// Usage in templates: `{{ payment.paid_on|date_long }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn date_long(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_date_long(&value.to_string()))
}

fn format_date_long(raw: &str) -> String {
    raw.parse::<chrono::NaiveDate>().map_or_else(
        |_| raw.to_string(),
        |date| date.format("%B %-d, %Y").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_long_formats_iso_dates() {
        assert_eq!(format_date_long("2026-03-14"), "March 14, 2026");
        assert_eq!(format_date_long("2025-12-01"), "December 1, 2025");
    }

    #[test]
    fn test_format_date_long_passes_garbage_through() {
        assert_eq!(format_date_long("not-a-date"), "not-a-date");
    }
}
