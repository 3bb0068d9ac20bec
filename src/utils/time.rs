// src/utils/time.rs

use chrono::{DateTime, Utc};

use crate::config::COMPLETED_AT_FORMAT;

/// Renders a completion timestamp as "HH:MM DD Month YYYY" in UTC.
pub fn format_completed_at(at: DateTime<Utc>) -> String {
    at.format(COMPLETED_AT_FORMAT).to_string()
}
