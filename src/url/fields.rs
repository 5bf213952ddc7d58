use crate::entry::{FieldAnomaly, DEFAULT_PRIORITY};
use chrono::{DateTime, FixedOffset, NaiveDate};

/// Change frequencies defined by the sitemaps protocol
pub const CHANGE_FREQUENCIES: &[&str] = &[
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];

/// Parses a W3C Datetime last-modified value
///
/// Accepted forms are `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYY-MM-DDThh:mmTZD` and
/// RFC 3339 timestamps with seconds and optional fractions. Date-only values
/// are taken as midnight UTC.
///
/// # Returns
///
/// * `Ok(None)` - The field was empty
/// * `Ok(Some(timestamp))` - The field parsed
/// * `Err(FieldAnomaly)` - The field was present but unreadable
pub fn parse_last_modified(raw: &str) -> Result<Option<DateTime<FixedOffset>>, FieldAnomaly> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    parse_w3c_datetime(value)
        .map(Some)
        .ok_or_else(|| FieldAnomaly::LastModified {
            value: value.to_string(),
        })
}

fn parse_w3c_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp);
    }

    // Minute precision: chrono wants a numeric offset, so spell out Z
    if value.contains('T') {
        let with_offset = match value.strip_suffix('Z') {
            Some(rest) => format!("{rest}+00:00"),
            None => value.to_string(),
        };
        return DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z").ok();
    }

    let padded = match value.len() {
        4 => format!("{value}-01-01"),
        7 => format!("{value}-01"),
        10 => value.to_string(),
        _ => return None,
    };
    let date = NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

/// Parses a priority value
///
/// An empty field yields the default priority. Anything that is not a finite
/// number between 0.0 and 1.0 also yields the default, reported as an anomaly.
pub fn parse_priority(raw: &str) -> Result<f64, FieldAnomaly> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(DEFAULT_PRIORITY);
    }

    match value.parse::<f64>() {
        Ok(priority) if priority.is_finite() && (0.0..=1.0).contains(&priority) => Ok(priority),
        _ => Err(FieldAnomaly::Priority {
            value: value.to_string(),
        }),
    }
}

/// Checks a change frequency against the protocol vocabulary
///
/// The value itself is always kept; an unknown word is only reported.
pub fn check_change_frequency(value: &str) -> Option<FieldAnomaly> {
    if value.is_empty()
        || CHANGE_FREQUENCIES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(value))
    {
        return None;
    }

    Some(FieldAnomaly::ChangeFrequency {
        value: value.to_string(),
    })
}
