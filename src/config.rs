//! Subscription configuration for the market data feed.
//!
//! This module provides the [`Subscription`] struct describing one
//! symbol feed: the templated endpoint, the display depth, and the
//! price precision used for rendering. Everything here is derived once
//! at construction and immutable afterwards.

use url::Url;

use crate::error::Error;

/// Base URL of the Gemini v1 market data WebSocket feed
pub const FEED_BASE_URL: &str = "wss://api.gemini.com/v1/marketdata";

/// Query appended to every subscription; trade events never change the
/// book, so their delivery is switched off at the source
const FEED_QUERY: &str = "trades=false";

/// Fractional digits for rendering USD-quoted prices
const USD_PRICE_PRECISION: usize = 2;

/// Fractional digits for rendering everything else
const DEFAULT_PRICE_PRECISION: usize = 9;

/// Subscription to one symbol's market data feed
///
/// # Example
///
/// ```rust
/// use gemini_feed::Subscription;
///
/// let sub = Subscription::new("btcusd", 5).unwrap();
/// assert_eq!(sub.price_precision(), 2);
/// assert_eq!(
///     sub.url().as_str(),
///     "wss://api.gemini.com/v1/marketdata/btcusd?trades=false"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Venue symbol (e.g. `btcusd`)
    symbol: String,

    /// Number of book rows rendered per qualifying update
    display_depth: usize,

    /// Fractional digits for price rendering
    price_precision: usize,

    /// Feed endpoint with the symbol templated in
    url: Url,
}

impl Subscription {
    /// Create a subscription for one symbol
    ///
    /// # Arguments
    ///
    /// * `symbol` - Venue symbol, e.g. `btcusd`
    /// * `display_depth` - Book rows to render per update, at least 1
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the symbol is empty, the depth is
    /// zero, or the templated endpoint is not a valid URL.
    pub fn new(symbol: impl Into<String>, display_depth: usize) -> Result<Self, Error> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(Error::Config("symbol must not be empty".to_string()));
        }
        if display_depth == 0 {
            return Err(Error::Config(
                "display depth must be at least 1".to_string(),
            ));
        }

        let url = Url::parse(&format!("{}/{}?{}", FEED_BASE_URL, symbol, FEED_QUERY))
            .map_err(|e| Error::Config(format!("bad feed URL for symbol {:?}: {}", symbol, e)))?;

        // USD-quoted pairs tick in cents; everything else gets the full
        // nine fractional digits the venue quotes
        let price_precision = if symbol.to_ascii_lowercase().ends_with("usd") {
            USD_PRICE_PRECISION
        } else {
            DEFAULT_PRICE_PRECISION
        };

        Ok(Self {
            symbol,
            display_depth,
            price_precision,
            url,
        })
    }

    /// Get the venue symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of book rows rendered per qualifying update
    pub fn display_depth(&self) -> usize {
        self.display_depth
    }

    /// Get the fractional digits used for price rendering
    pub fn price_precision(&self) -> usize {
        self.price_precision
    }

    /// Get the feed endpoint
    pub fn url(&self) -> &Url {
        &self.url
    }
}
