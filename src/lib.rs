//! # gemini-feed
//!
//! A console order book viewer for the [Gemini](https://www.gemini.com)
//! v1 market data WebSocket feed.
//!
//! ## Features
//!
//! - **Live book view** - top-N bid/ask rows, redrawn on every update
//!   that touches the visible depth
//! - **Tolerance-aware ladders** - decimal-text prices absorb binary
//!   float conversion noise instead of spawning spurious levels
//! - **Resilient transport** - automatic reconnection with exponential
//!   backoff, lifecycle transitions reported on the output sink
//! - **Async/Await** - built on Tokio
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_feed::{FeedClient, Subscription};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gemini_feed::Error> {
//!     let subscription = Subscription::new("btcusd", 5)?;
//!     let mut client = FeedClient::new(subscription, std::io::stdout());
//!
//!     client.run().await
//! }
//! ```
//!
//! ## Output
//!
//! Each qualifying update produces one full, independent redraw of the
//! configured number of rows, bids left, asks right:
//!
//! ```text
//! 97001.25      0.500000000	|	97003.10      1.250000000
//! 97000.00      2.000000000	|	NO ASK
//! ```
//!
//! USD-quoted symbols render prices with two fractional digits, all
//! other symbols with nine.
//!
//! ## Architecture
//!
//! This crate is organized into several modules:
//!
//! - [`client`] - WebSocket transport and the stream-to-book pipeline
//! - [`orderbook`] - Tolerance-aware price ladders with depth-reporting
//!   mutation
//! - [`types`] - Wire types for feed messages
//! - [`config`] - Subscription configuration (endpoint, depth, precision)
//! - [`error`] - Error types for the crate

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use client::{FeedClient, MessageOutcome};
pub use config::Subscription;
pub use error::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
