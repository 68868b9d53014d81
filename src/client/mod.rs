//! Feed clients for consuming Gemini market data.
//!
//! This module contains:
//!
//! - [`websocket`] - WebSocket transport with automatic reconnection
//! - [`feed`] - The stream-to-book pipeline and renderer

pub mod feed;
pub mod websocket;

pub use feed::{FeedClient, MessageOutcome};
pub use websocket::{FeedSocket, ReconnectConfig, ReconnectingSocket, SessionEvent};
