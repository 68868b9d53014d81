//! WebSocket message types.
//!
//! This module contains types for the market data messages Gemini
//! delivers over the WebSocket feed. Only the fields the book consumes
//! are modeled; everything else in the payload is ignored.

use serde::Deserialize;

use super::{Price, Quantity};
use crate::orderbook::Side;

/// One market data message from the feed.
///
/// A message without an `events` array fails deserialization and is
/// dropped whole. Within the array, individual event fields are optional:
/// a damaged event yields `None` from the accessors and is skipped
/// without discarding its siblings.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataMessage {
    /// Book events in application order.
    pub events: Vec<BookEvent>,
}

/// One incremental book event.
///
/// Gemini sends more fields than these (`type`, `reason`, `delta`, ...);
/// the book only needs the side and the level's new state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookEvent {
    /// Side label, `"bid"` or `"ask"`.
    pub side: Option<String>,
    /// Level price as decimal text.
    pub price: Option<String>,
    /// Remaining aggregate quantity at the level as decimal text.
    pub remaining: Option<String>,
}

impl BookEvent {
    /// Side the event applies to.
    ///
    /// A label starting with `b` is a bid, any other non-empty label an
    /// ask. Returns `None` for a missing or empty label.
    pub fn book_side(&self) -> Option<Side> {
        match self.side.as_deref()?.as_bytes().first() {
            Some(b'b') => Some(Side::Bid),
            Some(_) => Some(Side::Ask),
            None => None,
        }
    }

    /// Level price, if present and a finite decimal.
    pub fn price(&self) -> Option<Price> {
        parse_decimal(self.price.as_deref()?)
    }

    /// Remaining quantity, if present and a finite decimal.
    pub fn remaining(&self) -> Option<Quantity> {
        parse_decimal(self.remaining.as_deref()?)
    }
}

/// Parses decimal text to a finite float.
///
/// `NaN` and infinities parse successfully but would break the ordered
/// walk of the book, so they are rejected here along with garbage text.
fn parse_decimal(text: &str) -> Option<f64> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
