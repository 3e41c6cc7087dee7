//! Timestamp formatting utilities
//!
//! File entries carry a local wall-clock timestamp. The default rendering is
//! `2025-01-08 10:30:45,123`: date, time, and milliseconds after a comma.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format options for file entries
///
/// # Examples
///
/// ```
/// use instrumented_log::TimestampFormat;
/// use chrono::Local;
///
/// let stamp = TimestampFormat::default().format(&Local::now());
/// assert_eq!(stamp.len(), "2025-01-08 10:30:45,123".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45,123`
    #[default]
    DateTimeMillis,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+01:00`
    Iso8601,

    /// Custom strftime format; an invalid pattern renders as `DateTimeMillis`
    Custom(String),
}

const DATE_TIME_MILLIS: &str = "%Y-%m-%d %H:%M:%S,%3f";

fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::DateTimeMillis => datetime.format(DATE_TIME_MILLIS).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimestampFormat::Custom(pattern) if is_valid_pattern(pattern) => {
                datetime.format(pattern).to_string()
            }
            TimestampFormat::Custom(_) => datetime.format(DATE_TIME_MILLIS).to_string(),
        }
    }

    /// Reject custom patterns chrono cannot render
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(pattern) if !is_valid_pattern(pattern) => Err(LoggerError::config(
                "TimestampFormat",
                format!("invalid strftime pattern '{}'", pattern),
            )),
            _ => Ok(()),
        }
    }
}
