//! Deck value and ROI arithmetic
//!
//! Thin consumer of the pricing core: sums fetched card prices and compares
//! the total against the deck's retail price.

use crate::api::ScryfallCard;

/// Aggregate market value of a deck's cards in USD.
/// Cards Scryfall has no price for contribute nothing.
pub fn deck_market_value(cards: &[ScryfallCard]) -> f64 {
    cards.iter().filter_map(|c| c.usd_value()).sum()
}

/// Retail price vs. market value for one deck
#[derive(Debug, Clone, PartialEq)]
pub struct RoiSummary {
    pub msrp: f64,
    pub market_value: f64,
}

impl RoiSummary {
    pub fn new(msrp: f64, market_value: f64) -> Self {
        Self { msrp, market_value }
    }

    /// Return on investment as a percentage of the retail price
    pub fn roi_percent(&self) -> f64 {
        if self.msrp <= 0.0 {
            return 0.0;
        }
        (self.market_value - self.msrp) / self.msrp * 100.0
    }

    /// Market value per retail dollar
    pub fn value_ratio(&self) -> f64 {
        if self.msrp <= 0.0 {
            return 0.0;
        }
        self.market_value / self.msrp
    }
}
