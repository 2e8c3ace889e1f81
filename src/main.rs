//! Commander Precon ROI - CLI front end
//!
//! Fetches the card list and prices for a preconstructed deck's set,
//! serves repeat runs from the local price cache while it is fresh, and
//! prints the market value of the deck against its retail price.

use clap::Parser;
use precon_roi::{
    deck_market_value, format_static_price_age, read_static_price_timestamp, PriceCache,
    RequestDeduper, RoiSummary, ScryfallCard, ScryfallClient,
};
use std::path::PathBuf;

/// Estimate the ROI of a Commander precon against current card prices
#[derive(Parser, Debug)]
#[command(name = "precon_roi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scryfall set code of the precon (e.g. "40k", "onc")
    set_code: String,

    /// Retail price of the deck in USD
    #[arg(short, long, default_value_t = 44.99)]
    msrp: f64,

    /// Deck identifier used as the cache key (default: the set code)
    #[arg(long)]
    deck_id: Option<String>,

    /// Cache directory override
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Ignore cached prices and fetch fresh data
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Remove all cached price entries and exit
    #[arg(long, default_value_t = false)]
    clear_cache: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cache_dir = args
        .cache_dir
        .clone()
        .unwrap_or_else(PriceCache::default_dir);
    let cache = PriceCache::new(&cache_dir);

    if args.clear_cache {
        let removed = cache.clear_all();
        println!("Removed {} cached price entries", removed);
        return;
    }

    let deck_id = args
        .deck_id
        .clone()
        .unwrap_or_else(|| args.set_code.to_lowercase());

    let cards = match load_deck_cards(&cache, &deck_id, &args).await {
        Ok(cards) => cards,
        Err(e) => {
            log::error!("Failed to load card prices: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let market_value = deck_market_value(&cards);
    let summary = RoiSummary::new(args.msrp, market_value);

    println!("Deck:          {} ({} cards)", deck_id, cards.len());
    println!("MSRP:          ${:.2}", summary.msrp);
    println!("Market value:  ${:.2}", summary.market_value);
    println!("ROI:           {:+.1}%", summary.roi_percent());
    if let Some(age) = cache.format_age(&deck_id) {
        println!("Prices as of:  {}", age);
    }
    let marker = cache_dir.join("prices-updated-at");
    if let Some(age) = format_static_price_age(read_static_price_timestamp(&marker)) {
        println!("Dataset age:   {}", age);
    }
}

/// Serve from cache while fresh; otherwise fetch through the deduplicator
/// and write the snapshot back.
async fn load_deck_cards(
    cache: &PriceCache,
    deck_id: &str,
    args: &Args,
) -> precon_roi::Result<Vec<ScryfallCard>> {
    if !args.refresh && !cache.is_stale(deck_id) {
        if let Some(entry) = cache.get(deck_id) {
            match serde_json::from_value::<Vec<ScryfallCard>>(entry.cards) {
                Ok(cards) => {
                    log::info!("Serving {} cards for {} from cache", cards.len(), deck_id);
                    return Ok(cards);
                }
                Err(e) => log::warn!("Cached payload unusable, refetching: {}", e),
            }
        }
    }

    let client = ScryfallClient::new();
    let deduper: RequestDeduper<Vec<ScryfallCard>> = RequestDeduper::new();
    let set_code = args.set_code.clone();
    let key = format!("set:{}", set_code.to_lowercase());
    let cards = deduper
        .dedupe(&key, move || async move {
            client.load_set_cards(&set_code).await
        })
        .await?;

    match serde_json::to_value(&cards) {
        Ok(payload) => {
            if !cache.set(deck_id, payload) {
                log::warn!("Proceeding without caching prices for {}", deck_id);
            }
        }
        Err(e) => log::warn!("Failed to serialize snapshot for {}: {}", deck_id, e),
    }

    Ok(cards)
}
