//! Scalar and wire types for the Gemini market data feed.
//!
//! - [`messages`] - WebSocket message types
//!
//! Prices and quantities arrive as decimal text and are parsed to `f64`
//! on access. Two prices within [`PRICE_EPSILON`](crate::orderbook::PRICE_EPSILON)
//! of each other are the same price as far as the book is concerned.

pub mod messages;

pub use messages::{BookEvent, MarketDataMessage};

/// Price in quote-currency units.
///
/// Transmitted as decimal text; parsing to binary floating point loses a
/// few low bits, which the book absorbs with a fixed absolute tolerance
/// instead of exact equality.
pub type Price = f64;

/// Aggregate quantity resting at one price level.
///
/// A non-positive quantity is never stored; it means the level is gone.
pub type Quantity = f64;
