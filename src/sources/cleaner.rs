
use crate::models::PLACEHOLDER;
use chrono::NaiveDate;

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Parse calendar dates: ISO first (both providers), then other common layouts.
/// "2024-06-06" | "Jun 06, 2024" | "06/06/2024" (US) | "6 Jun 2024"
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%b %d, %Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d %b %Y") {
        return Some(d);
    }
    // "2024-06-06 00:00:00" and similar timestamp forms
    if let Some((day, _)) = s.split_once([' ', 'T']) {
        return NaiveDate::parse_from_str(day, "%Y-%m-%d").ok();
    }

    None
}

/// Trimmed value, or the placeholder when absent or blank.
pub fn or_placeholder(s: Option<&str>) -> String {
    match s.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Trimmed value, `None` when absent or blank.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
