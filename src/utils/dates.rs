use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Parse a date coming from the API.
///
/// The server sends either `YYYY-MM-DD` or an ISO date-time, with or without
/// fractional seconds and offset. Date-only values land on midnight.
pub fn parse_api_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Display format used on screen and inside QR payloads.
pub fn format_display_date(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "N/A".to_string(),
    }
}

/// Serde helper: optional lenient date, unparseable values become `None`.
pub fn deserialize_opt_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_api_datetime))
}
