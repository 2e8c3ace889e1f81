//! Commander Precon ROI - card pricing acquisition and caching
//!
//! Estimates the return on investment of MTG Commander preconstructed decks
//! by comparing retail price against the aggregate market value of the
//! deck's cards. The core is the pricing data layer: a retrying Scryfall
//! client, a request deduplicator, and a durable per-deck price cache.

pub mod api;
pub mod cache;
pub mod dedupe;
pub mod error;
pub mod roi;

// Re-export commonly used items
pub use api::{ScryfallCard, ScryfallClient};
pub use cache::{
    format_static_price_age, read_static_price_timestamp, CachedPriceData, PriceCache,
};
pub use dedupe::RequestDeduper;
pub use error::{PriceError, Result};
pub use roi::{deck_market_value, RoiSummary};
