//! Utility functions for date normalization and error payload handling.

/// Normalize a workout date to the `YYYY-MM-DD` form the backend parses.
///
/// Accepts:
/// - YYYY-MM-DD -> unchanged
/// - RFC3339 datetime -> its local date
/// - Naive datetime YYYY-MM-DDTHH:MM:SS -> its date
pub fn normalize_workout_date(s: &str) -> Option<String> {
    let s = s.trim();
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date().format("%Y-%m-%d").to_string());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date().format("%Y-%m-%d").to_string());
    }
    None
}

/// Render a wire date as e.g. `March 4, 2025`; unparseable input is returned as-is.
pub fn display_date(s: &str) -> String {
    match normalize_workout_date(s)
        .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
    {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => s.to_string(),
    }
}

/// Pull the human-readable message out of an error payload.
///
/// The backend uses `error`; JWT failures come back as `msg`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message", "msg"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(256).collect()
}
