//! Caching layer for fetched price data

pub mod price_cache;
pub mod static_prices;

pub use price_cache::{
    CachedPriceData, PriceCache, CACHE_PREFIX, CACHE_SCHEMA_VERSION, STALE_AFTER_DAYS,
};
pub use static_prices::{format_static_price_age, read_static_price_timestamp};
