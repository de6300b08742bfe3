use crate::constants::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::PathBuf;

/// Get data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d-%b-%Y", "%d-%m-%Y", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a trade date as found in bhavcopy files.
///
/// Date-only values resolve to midnight. RFC 3339 values keep their wall-clock time.
pub fn parse_trade_date(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            if let Some(time) = date.and_hms_opt(0, 0, 0) {
                return Ok(time);
            }
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(time);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|time| time.naive_local())
        .map_err(|_| Error::Parse(format!("Unrecognized trade date: '{}'", value)))
}

/// Format a timestamp the way chart JSON expects it (ISO 8601, no zone)
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}
