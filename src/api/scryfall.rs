//! Scryfall API client for card and price data
//!
//! Uses async reqwest for non-blocking HTTP requests. Every call is bounded
//! by a request timeout, and rate-limit responses (HTTP 429) are retried with
//! exponential backoff up to a fixed attempt ceiling. All failures leave the
//! client as one of the classified [`PriceError`] kinds.

use crate::error::{PriceError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production Scryfall API base URL
pub const SCRYFALL_API: &str = "https://api.scryfall.com";

/// Deadline for a single network call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Total attempts per call while rate limited (1 initial + 2 retries)
pub const MAX_ATTEMPTS: u32 = 3;

/// Initial backoff delay, doubled on each further attempt
pub const BACKOFF_BASE: Duration = Duration::from_millis(500);

const USER_AGENT: &str = "PreconROI/1.0";

/// Scryfall card response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    pub set: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub prices: ScryfallPrices,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ScryfallPrices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
}

impl ScryfallCard {
    /// Market value in USD, falling back to the foil price for foil-only
    /// printings. `None` when Scryfall has no price for this printing.
    pub fn usd_value(&self) -> Option<f64> {
        self.prices
            .usd
            .as_deref()
            .or(self.prices.usd_foil.as_deref())
            .and_then(|p| p.parse().ok())
    }
}

/// One page of a paginated Scryfall list response
#[derive(Debug, Deserialize)]
pub struct ScryfallList {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_cards: Option<u64>,
}

/// Scryfall API error response body
#[derive(Debug, Deserialize)]
pub struct ScryfallApiError {
    pub status: u16,
    pub code: String,
    pub details: String,
}

/// Scryfall client with timeout and bounded rate-limit retry
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_attempts: u32,
    backoff_base: Duration,
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScryfallClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: SCRYFALL_API.to_string(),
            timeout: REQUEST_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
            backoff_base: BACKOFF_BASE,
        }
    }

    /// Point the client at a different base URL (tests use a mock server)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Look up cards by name or full Scryfall query syntax.
    /// Returns the first page of matches.
    pub async fn search_cards(&self, query: &str) -> Result<Vec<ScryfallCard>> {
        let url = format!(
            "{}/cards/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let list = self.fetch_list(&url).await?;
        Ok(list.data)
    }

    /// Resolve exactly one card by name (fuzzy match), used by bulk import
    pub async fn get_card_by_name(&self, name: &str) -> Result<ScryfallCard> {
        let url = format!(
            "{}/cards/named?fuzzy={}",
            self.base_url,
            urlencoding::encode(name)
        );
        log::debug!("Fetching card from Scryfall: {}", name);

        let response = self.send_with_retry(&url).await?;
        Ok(response.json::<ScryfallCard>().await?)
    }

    /// Load every card in a set, in server-provided order.
    ///
    /// Pages are fetched strictly sequentially because the "more pages"
    /// signal is only known after the previous page returns. A rate-limit or
    /// timeout failure mid-pagination aborts the whole operation; no partial
    /// results are returned.
    pub async fn load_set_cards(&self, set_code: &str) -> Result<Vec<ScryfallCard>> {
        let mut pages = self.set_pages(set_code);
        let mut cards = Vec::new();
        while let Some(page) = pages.next_page().await {
            cards.extend(page?);
        }
        log::info!("Loaded {} cards for set {}", cards.len(), set_code);
        Ok(cards)
    }

    /// Lazy page sequence over a set listing. Callers that only need a
    /// prefix of the set can stop polling; [`Self::load_set_cards`] drains it.
    pub fn set_pages(&self, set_code: &str) -> SetPages<'_> {
        let query = format!("e:{}", set_code.to_lowercase());
        let first_url = format!(
            "{}/cards/search?order=set&unique=prints&q={}",
            self.base_url,
            urlencoding::encode(&query)
        );
        SetPages {
            client: self,
            next_url: Some(first_url),
        }
    }

    async fn fetch_list(&self, url: &str) -> Result<ScryfallList> {
        let response = self.send_with_retry(url).await?;
        Ok(response.json::<ScryfallList>().await?)
    }

    /// Single logical request: timeout-bounded, retried only on HTTP 429.
    ///
    /// A timeout is never retried; it surfaces immediately as
    /// [`PriceError::Timeout`] via the `From<reqwest::Error>` conversion.
    async fn send_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            log::debug!("GET {} (attempt {}/{})", url, attempt, self.max_attempts);

            let response = self
                .http
                .get(url)
                .header("User-Agent", USER_AGENT)
                .timeout(self.timeout)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.max_attempts {
                    log::warn!("Scryfall still rate limited after {} attempts", attempt);
                    return Err(PriceError::RateLimitExceeded(status.as_u16()));
                }
                // Exponential backoff: base, base*2, base*4, ...
                let delay = self.backoff_base * 2u32.pow(attempt - 1);
                log::info!(
                    "Scryfall rate limited (attempt {}/{}), backing off {:?}",
                    attempt,
                    self.max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            if status == StatusCode::SERVICE_UNAVAILABLE {
                return Err(PriceError::ServiceUnavailable);
            }
            if !status.is_success() {
                return Err(classify_error_body(status, response).await);
            }
            return Ok(response);
        }
    }
}

/// Map a non-success response to a classified error, preferring Scryfall's
/// structured error body when it parses.
async fn classify_error_body(status: StatusCode, response: reqwest::Response) -> PriceError {
    match response.json::<ScryfallApiError>().await {
        Ok(body) => PriceError::ApiResponse {
            code: body.code,
            details: body.details,
        },
        Err(_) => PriceError::HttpStatus(status.as_u16()),
    }
}

/// Restartable page producer for a set listing
pub struct SetPages<'a> {
    client: &'a ScryfallClient,
    next_url: Option<String>,
}

impl SetPages<'_> {
    /// Fetch the next page, or `None` when the API signalled no more pages.
    /// A failed page leaves the sequence exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Vec<ScryfallCard>>> {
        let url = self.next_url.take()?;
        match self.client.fetch_list(&url).await {
            Ok(list) => {
                if list.has_more {
                    self.next_url = list.next_page;
                }
                Some(Ok(list.data))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
