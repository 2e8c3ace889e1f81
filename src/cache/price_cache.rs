//! Durable per-deck price snapshot cache
//!
//! Stores one JSON file per deck in the cache directory, keyed by a fixed
//! `deck-prices-` prefix so bulk clearing only ever touches this subsystem's
//! files. Read and format paths never fail: malformed stored content is
//! discarded as a cache miss, and write failures are reported as `false`
//! rather than raised.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name prefix reserved for this subsystem's entries
pub const CACHE_PREFIX: &str = "deck-prices-";

/// Entries older than this many days are considered unreliable.
/// The boundary is exclusive: exactly 7.0 days is still fresh.
pub const STALE_AFTER_DAYS: f64 = 7.0;

/// Bumped whenever the stored shape changes; older entries read as misses
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// One cached price snapshot for a deck
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedPriceData {
    pub version: u32,
    pub deck_id: String,
    /// Opaque price payload, passed through unchanged
    pub cards: serde_json::Value,
    /// Stamped by the cache at write time, never caller-supplied
    pub fetched_at: DateTime<Utc>,
}

/// Persistent cache of the last successfully fetched prices per deck
pub struct PriceCache {
    cache_dir: PathBuf,
}

impl PriceCache {
    /// Create a cache rooted at `cache_dir`, creating the directory if needed
    pub fn new(cache_dir: &Path) -> Self {
        if let Err(e) = std::fs::create_dir_all(cache_dir) {
            log::warn!("Failed to create price cache directory: {}", e);
        }
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Default cache location: ~/.cache/precon_roi
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("precon_roi")
    }

    fn entry_path(&self, deck_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}{}.json", CACHE_PREFIX, deck_id))
    }

    /// Get the stored snapshot for a deck. Unreadable or malformed content
    /// yields `None`, never an error.
    pub fn get(&self, deck_id: &str) -> Option<CachedPriceData> {
        let path = self.entry_path(deck_id);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<CachedPriceData>(&content) {
            Ok(entry) if entry.version == CACHE_SCHEMA_VERSION => Some(entry),
            Ok(entry) => {
                log::debug!(
                    "Discarding cache entry for {} with schema version {}",
                    deck_id,
                    entry.version
                );
                None
            }
            Err(e) => {
                log::warn!("Discarding malformed cache entry for {}: {}", deck_id, e);
                None
            }
        }
    }

    /// Store a snapshot, overwriting any prior entry for the deck.
    /// Returns `false` when the write fails; prior entries stay intact.
    pub fn set(&self, deck_id: &str, cards: serde_json::Value) -> bool {
        let entry = CachedPriceData {
            version: CACHE_SCHEMA_VERSION,
            deck_id: deck_id.to_string(),
            cards,
            fetched_at: Utc::now(),
        };
        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &CachedPriceData) -> bool {
        let path = self.entry_path(&entry.deck_id);
        match serde_json::to_string(entry) {
            Ok(json) => match std::fs::write(&path, json) {
                Ok(()) => {
                    log::debug!("Cached prices for deck {}", entry.deck_id);
                    true
                }
                Err(e) => {
                    log::warn!("Failed to write price cache for {}: {}", entry.deck_id, e);
                    false
                }
            },
            Err(e) => {
                log::warn!("Failed to serialize price cache for {}: {}", entry.deck_id, e);
                false
            }
        }
    }

    /// Elapsed time in fractional days since the entry was fetched
    pub fn age_days(&self, deck_id: &str) -> Option<f64> {
        let entry = self.get(deck_id)?;
        let elapsed = Utc::now().signed_duration_since(entry.fetched_at);
        Some(elapsed.num_milliseconds() as f64 / 86_400_000.0)
    }

    /// True when no entry exists or the entry is past the staleness window
    pub fn is_stale(&self, deck_id: &str) -> bool {
        match self.age_days(deck_id) {
            Some(age) => age > STALE_AFTER_DAYS,
            None => true,
        }
    }

    /// Remove every entry with the reserved prefix, leaving unrelated files
    /// in the cache directory untouched. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        let Ok(entries) = std::fs::read_dir(&self.cache_dir) else {
            return 0;
        };
        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(CACHE_PREFIX)
                && name.ends_with(".json")
                && std::fs::remove_file(entry.path()).is_ok()
            {
                removed += 1;
            }
        }
        log::info!("Cleared {} price cache entries", removed);
        removed
    }

    /// Human-readable age of the deck's entry, or `None` without one
    pub fn format_age(&self, deck_id: &str) -> Option<String> {
        let entry = self.get(deck_id)?;
        Some(format_elapsed(
            Utc::now().signed_duration_since(entry.fetched_at),
        ))
    }
}

/// Bucketed age string shared by the per-deck and static-timestamp paths:
/// "Just now" under an hour, "<n>h ago" under a day, then day counts.
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let hours = elapsed.num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    let days = elapsed.num_days();
    if days < 1 {
        format!("{}h ago", hours)
    } else if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", days)
    }
}

#[cfg(test)]
#[path = "price_cache_tests.rs"]
mod tests;
