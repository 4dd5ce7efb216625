use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    format_rfc3339(Utc::now())
}

/// Render an instant the way every persisted timestamp is written:
/// UTC, millisecond precision, `Z` suffix (`2024-03-01T12:00:00.000Z`).
pub fn format_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 instant.
///
/// Accepts full RFC 3339 timestamps with any offset, naive date-times
/// (taken as UTC) and bare dates (midnight UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
