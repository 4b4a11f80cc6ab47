use chrono::{NaiveDate, NaiveDateTime};

use crate::error::LarderError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a processing date into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and date-times whose time part is
/// dropped. Anything else is rejected with the offending value.
pub fn normalize_date(raw: &str) -> Result<NaiveDate, LarderError> {
    let s = raw.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(LarderError::InvalidDate {
        value: raw.to_string(),
    })
}

/// Strict `YYYY-MM-DD` check used for request parameters.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, LarderError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| LarderError::InvalidDate {
        value: raw.to_string(),
    })
}
