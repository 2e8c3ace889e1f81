//! Global "price data last updated" marker
//!
//! A single timestamp records when the whole price dataset was last
//! refreshed, independent of any per-deck cache entry. Absent or malformed
//! markers render as nothing rather than failing.

use chrono::{DateTime, Utc};
use std::path::Path;

use super::price_cache::format_elapsed;

/// Human-readable age of the global price dataset. `None` in, `None` out.
pub fn format_static_price_age(updated_at: Option<DateTime<Utc>>) -> Option<String> {
    let ts = updated_at?;
    Some(format_elapsed(Utc::now().signed_duration_since(ts)))
}

/// Read the RFC 3339 marker file written by the price refresh job.
/// A missing or malformed file yields `None`.
pub fn read_static_price_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let content = std::fs::read_to_string(path).ok()?;
    match DateTime::parse_from_rfc3339(content.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("Ignoring malformed price timestamp marker: {}", e);
            None
        }
    }
}
