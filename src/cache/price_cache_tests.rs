//! Tests for the per-deck price cache.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use super::{
    format_elapsed, CachedPriceData, PriceCache, CACHE_PREFIX, CACHE_SCHEMA_VERSION,
};

fn sample_cards() -> serde_json::Value {
    serde_json::json!([
        { "name": "Sol Ring", "usd": "1.25" },
        { "name": "Arcane Signet", "usd": "0.80" }
    ])
}

/// Plant an entry with a back-dated fetch timestamp.
fn backdate_entry(cache: &PriceCache, deck_id: &str, age: Duration) {
    let entry = CachedPriceData {
        version: CACHE_SCHEMA_VERSION,
        deck_id: deck_id.to_string(),
        cards: sample_cards(),
        fetched_at: Utc::now() - age,
    };
    assert!(cache.write_entry(&entry));
}

#[test]
fn set_then_get_round_trips_payload() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    assert!(cache.set("deck-1", sample_cards()));

    let entry = cache.get("deck-1").unwrap();
    assert_eq!(entry.deck_id, "deck-1");
    assert_eq!(entry.cards, sample_cards());
}

#[test]
fn set_overwrites_prior_entry() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    cache.set("deck-1", serde_json::json!({ "total": 10 }));
    cache.set("deck-1", serde_json::json!({ "total": 20 }));

    let entry = cache.get("deck-1").unwrap();
    assert_eq!(entry.cards["total"], 20);
}

#[test]
fn fresh_entry_has_near_zero_age_and_formats_just_now() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    cache.set("deck-1", sample_cards());

    let age = cache.age_days("deck-1").unwrap();
    assert!(age >= 0.0 && age < 0.001, "age was {age}");
    assert_eq!(cache.format_age("deck-1").as_deref(), Some("Just now"));
}

#[test]
fn missing_entry_yields_no_age_and_is_stale() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    assert!(cache.get("nope").is_none());
    assert!(cache.age_days("nope").is_none());
    assert!(cache.format_age("nope").is_none());
    assert!(cache.is_stale("nope"));
}

#[test]
fn staleness_boundary_is_exclusive_at_seven_days() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    // A hair under 7 days: fresh
    backdate_entry(&cache, "fresh", Duration::days(7) - Duration::minutes(1));
    assert!(!cache.is_stale("fresh"));

    // Past 7 days: stale
    backdate_entry(&cache, "old", Duration::days(7) + Duration::minutes(1));
    assert!(cache.is_stale("old"));

    backdate_entry(&cache, "ancient", Duration::days(30));
    assert!(cache.is_stale("ancient"));
}

#[test]
fn malformed_entry_reads_as_miss() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    let path = dir.path().join(format!("{}deck-1.json", CACHE_PREFIX));
    std::fs::write(&path, "{ not json !").unwrap();

    assert!(cache.get("deck-1").is_none());
    assert!(cache.is_stale("deck-1"));
}

#[test]
fn unknown_schema_version_reads_as_miss() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    let entry = CachedPriceData {
        version: CACHE_SCHEMA_VERSION + 1,
        deck_id: "deck-1".to_string(),
        cards: sample_cards(),
        fetched_at: Utc::now(),
    };
    let path = dir.path().join(format!("{}deck-1.json", CACHE_PREFIX));
    std::fs::write(&path, serde_json::to_string(&entry).unwrap()).unwrap();

    assert!(cache.get("deck-1").is_none());
}

#[test]
fn set_reports_failure_without_panicking() {
    let dir = TempDir::new().unwrap();
    // A cache rooted at a path that is a file, so writes fail
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let cache = PriceCache::new(&blocker);

    assert!(!cache.set("deck-1", sample_cards()));
}

#[test]
fn clear_all_removes_only_prefixed_files() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    cache.set("deck-1", sample_cards());
    cache.set("deck-2", sample_cards());
    let unrelated = dir.path().join("unrelated.json");
    std::fs::write(&unrelated, "{}").unwrap();

    assert_eq!(cache.clear_all(), 2);
    assert!(cache.get("deck-1").is_none());
    assert!(cache.get("deck-2").is_none());
    assert!(unrelated.exists());
}

#[test]
fn format_age_buckets() {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(dir.path());

    backdate_entry(&cache, "hours", Duration::minutes(90));
    assert_eq!(cache.format_age("hours").as_deref(), Some("1h ago"));

    backdate_entry(&cache, "one-day", Duration::hours(25));
    assert_eq!(cache.format_age("one-day").as_deref(), Some("1 day ago"));

    backdate_entry(&cache, "days", Duration::days(3));
    assert_eq!(cache.format_age("days").as_deref(), Some("3 days ago"));
}

#[test]
fn format_elapsed_buckets_directly() {
    assert_eq!(format_elapsed(Duration::minutes(5)), "Just now");
    assert_eq!(format_elapsed(Duration::minutes(59)), "Just now");
    assert_eq!(format_elapsed(Duration::minutes(90)), "1h ago");
    assert_eq!(format_elapsed(Duration::hours(23)), "23h ago");
    assert_eq!(format_elapsed(Duration::hours(24)), "1 day ago");
    assert_eq!(format_elapsed(Duration::hours(47)), "1 day ago");
    assert_eq!(format_elapsed(Duration::days(2)), "2 days ago");
}
