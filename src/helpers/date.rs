//! Timestamp helpers
//!
//! Posts and comments store their timestamps as `DEFAULT_TIMESTAMP_FORMAT`
//! strings, which sort lexicographically in time order. The configured
//! `timestamp_format` is only applied when a timestamp is displayed.

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Storage format for every timestamp
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Produces "now" timestamps for the store
#[derive(Debug, Clone, Default)]
pub struct Clock {
    tz: Option<Tz>,
}

impl Clock {
    /// `None` uses host local time
    pub fn new(tz: Option<Tz>) -> Self {
        Self { tz }
    }

    /// Current time in storage format
    pub fn now(&self) -> String {
        match self.tz {
            Some(tz) => Utc::now()
                .with_timezone(&tz)
                .format(DEFAULT_TIMESTAMP_FORMAT)
                .to_string(),
            None => Local::now().format(DEFAULT_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Whether chrono can format with `format` without failing
pub fn is_valid_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Reformat a stored timestamp for display.
///
/// Values that do not parse, or an unusable format, give back the stored text.
pub fn format_timestamp(timestamp: &str, format: &str) -> String {
    if !is_valid_format(format) {
        return timestamp.to_string();
    }
    match NaiveDateTime::parse_from_str(timestamp, DEFAULT_TIMESTAMP_FORMAT) {
        Ok(parsed) => parsed.format(format).to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Date portion of a stored timestamp ("2024-01-15 10:30:00" -> "2024-01-15")
pub fn date_part(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(10) {
        Some((idx, _)) => &timestamp[..idx],
        None => timestamp,
    }
}
