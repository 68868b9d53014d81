//! Price-aggregated order book for one side-pair of a symbol.
//!
//! The book is two independent [`Ladder`]s, one per [`Side`], each a
//! strictly-ordered sequence of [`Level`]s in which no two resident
//! prices are closer than [`PRICE_EPSILON`].
//!
//! - [`level`] - A single price level and the tolerance compare
//! - [`ladder`] - One side's sorted ladder with depth-reporting mutation
//!
//! # Example
//!
//! ```rust
//! use gemini_feed::orderbook::{Ladder, Side};
//!
//! let mut bids = Ladder::new(Side::Bid);
//!
//! bids.upsert(3626.73, 1.6);
//! bids.upsert(3626.98, 0.5);
//!
//! if let Some(best) = bids.top_of_book() {
//!     println!("Best bid: {} @ {}", best.quantity, best.price);
//! }
//! ```

pub mod ladder;
pub mod level;

pub use ladder::{Ladder, Side};
pub use level::{Level, PRICE_EPSILON};
