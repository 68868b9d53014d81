//! WebSocket transport for the Gemini market data feed.
//!
//! This module provides two layers:
//!
//! - [`FeedSocket`] - one WebSocket session delivering raw text payloads
//! - [`ReconnectingSocket`] - wraps a session with exponential-backoff
//!   reconnection and reports lifecycle transitions as [`SessionEvent`]s
//!
//! The subscription is carried entirely by the endpoint URL, so a fresh
//! connection needs no replay step: Gemini sends the current book as the
//! first message of every session.
//!
//! # Example
//!
//! ```rust,no_run
//! use gemini_feed::client::{ReconnectConfig, ReconnectingSocket, SessionEvent};
//! use gemini_feed::Subscription;
//!
//! # async fn example() -> gemini_feed::Result<()> {
//! let sub = Subscription::new("btcusd", 5)?;
//! let mut socket =
//!     ReconnectingSocket::connect(sub.url().clone(), ReconnectConfig::default()).await?;
//!
//! while let Some(event) = socket.next().await {
//!     match event {
//!         SessionEvent::Open => println!("connected"),
//!         SessionEvent::Message(text) => println!("{}", text),
//!         SessionEvent::Closed => println!("connection lost"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::warn;
use url::Url;

use crate::error::Error;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A single WebSocket session to the market data feed
///
/// Yields the raw text payloads the server sends. Control frames are
/// handled internally: pings are answered, close frames surface as
/// [`Error::ConnectionClosed`].
///
/// # Thread Safety
///
/// This socket is NOT thread-safe. It is meant to be driven by exactly
/// one task; the feed serializes message handling by construction.
#[derive(Debug)]
pub struct FeedSocket {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
}

impl FeedSocket {
    /// Connect to a feed endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP/TLS connection or the WebSocket
    /// upgrade fails.
    pub async fn connect(url: &Url) -> Result<Self, Error> {
        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (write, read) = ws_stream.split();

        Ok(Self { write, read })
    }

    /// Receive the next text payload from the session
    ///
    /// # Returns
    ///
    /// The next payload, or `None` once the underlying stream is
    /// exhausted. A close frame from the server is reported as
    /// `Some(Err(Error::ConnectionClosed))`.
    pub async fn next(&mut self) -> Option<Result<String, Error>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Ping(data)) => {
                    // Respond to pings automatically
                    if let Err(e) = self.write.send(Message::Pong(data)).await {
                        return Some(Err(e.into()));
                    }
                }
                Ok(Message::Close(_)) => {
                    return Some(Err(Error::ConnectionClosed));
                }
                Ok(_) => {
                    // Ignore other message types (Binary, Pong, Frame)
                    continue;
                }
                Err(e) => {
                    return Some(Err(e.into()));
                }
            }
        }
    }

    /// Close the WebSocket session
    pub async fn close(&mut self) -> Result<(), Error> {
        self.write.close().await?;
        Ok(())
    }
}

/// Configuration for reconnection behavior
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of reconnection attempts (0 = infinite)
    pub max_retries: u32,
    /// Initial delay between reconnection attempts
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    /// The feed's fixed policy: retry forever, starting at 500ms and
    /// doubling up to a 5s ceiling
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 500,
            max_delay_ms: 5_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Create a new reconnect config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum retries (0 = infinite)
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set initial delay in milliseconds
    pub fn initial_delay_ms(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    /// Set maximum delay in milliseconds
    pub fn max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Set backoff multiplier
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given retry attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> std::time::Duration {
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;
        std::time::Duration::from_millis(delay_ms)
    }
}

/// One lifecycle event of a reconnecting feed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was established (also after each reconnect)
    Open,
    /// A raw text payload arrived
    Message(String),
    /// The current session was lost; reconnection follows
    Closed,
}

/// WebSocket transport with automatic reconnection support.
///
/// This wrapper around [`FeedSocket`] provides:
/// - Automatic reconnection with exponential backoff
/// - Session lifecycle reporting via [`SessionEvent`]
/// - Connection state tracking
///
/// Everything is pulled through [`next`](Self::next) by a single
/// consumer task, so there are no callbacks that could race teardown:
/// dropping the socket (or the future driving it) is a complete,
/// race-free close.
pub struct ReconnectingSocket {
    /// The underlying session
    socket: Option<FeedSocket>,
    /// Feed endpoint to (re)connect to
    url: Url,
    /// Reconnection configuration
    config: ReconnectConfig,
    /// Current reconnection attempt
    reconnect_attempt: u32,
    /// An `Open` event is owed to the consumer
    pending_open: bool,
}

impl std::fmt::Debug for ReconnectingSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectingSocket")
            .field("url", &self.url.as_str())
            .field("connected", &self.socket.is_some())
            .field("reconnect_attempt", &self.reconnect_attempt)
            .finish()
    }
}

impl ReconnectingSocket {
    /// Connect to a feed endpoint with reconnection support
    ///
    /// The initial connection is attempted eagerly so that an endpoint
    /// the venue rejects outright (unknown symbol) fails fast instead
    /// of retrying forever.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial connection fails.
    pub async fn connect(url: Url, config: ReconnectConfig) -> Result<Self, Error> {
        let socket = FeedSocket::connect(&url).await?;

        Ok(Self {
            socket: Some(socket),
            url,
            config,
            reconnect_attempt: 0,
            pending_open: true,
        })
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Get the current reconnection attempt number
    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    /// Get the feed endpoint
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Receive the next session event, reconnecting if necessary
    ///
    /// Yields `Open` once per established session, then its payloads as
    /// `Message`, then `Closed` when the session is lost. Reconnection
    /// with backoff happens inside this method between `Closed` and the
    /// next `Open`.
    ///
    /// # Returns
    ///
    /// The next event, or `None` once the configured retry budget is
    /// exhausted (never with an infinite budget).
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            if self.pending_open {
                self.pending_open = false;
                return Some(SessionEvent::Open);
            }

            if let Some(ref mut socket) = self.socket {
                match socket.next().await {
                    Some(Ok(text)) => {
                        self.reconnect_attempt = 0; // Reset on successful message
                        return Some(SessionEvent::Message(text));
                    }
                    Some(Err(e)) => {
                        // Any read error ends the session; the backoff
                        // loop takes it from here
                        warn!(error = %e, "feed session lost");
                        self.socket = None;
                        return Some(SessionEvent::Closed);
                    }
                    None => {
                        self.socket = None;
                        return Some(SessionEvent::Closed);
                    }
                }
            }

            // Not connected: reconnect, then loop back to yield `Open`
            if self.attempt_reconnect().await.is_err() {
                return None;
            }
        }
    }

    /// Attempt to reconnect with exponential backoff
    async fn attempt_reconnect(&mut self) -> Result<(), Error> {
        loop {
            // Check max retries
            if self.config.max_retries > 0 && self.reconnect_attempt >= self.config.max_retries {
                warn!(
                    attempts = self.reconnect_attempt,
                    "giving up on reconnection"
                );
                return Err(Error::ConnectionClosed);
            }

            // Calculate and wait for backoff delay
            let delay = self.config.delay_for_attempt(self.reconnect_attempt);
            tokio::time::sleep(delay).await;

            self.reconnect_attempt += 1;

            match FeedSocket::connect(&self.url).await {
                Ok(socket) => {
                    self.socket = Some(socket);
                    self.pending_open = true;
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        attempt = self.reconnect_attempt,
                        error = %e,
                        "reconnection attempt failed"
                    );
                    continue;
                }
            }
        }
    }

    /// Close the current session
    ///
    /// Idempotent; further calls are no-ops. To stop for good, drop the
    /// socket instead of pulling [`next`](Self::next) again, which would
    /// reconnect.
    pub async fn close(&mut self) -> Result<(), Error> {
        if let Some(ref mut socket) = self.socket {
            socket.close().await?;
        }
        self.socket = None;
        self.pending_open = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_config_default() {
        let config = ReconnectConfig::default();
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.initial_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 5_000);
        assert!((config.backoff_multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reconnect_config_builder() {
        let config = ReconnectConfig::new()
            .max_retries(5)
            .initial_delay_ms(50)
            .max_delay_ms(10_000)
            .backoff_multiplier(1.5);

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_delay_ms, 50);
        assert_eq!(config.max_delay_ms, 10_000);
        assert!((config.backoff_multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_delay_schedule() {
        let config = ReconnectConfig::default();

        let ms = |attempt| config.delay_for_attempt(attempt).as_millis();
        assert_eq!(ms(0), 500);
        assert_eq!(ms(1), 1_000);
        assert_eq!(ms(2), 2_000);
        assert_eq!(ms(3), 4_000);
        // Capped at max_delay_ms from here on
        assert_eq!(ms(4), 5_000);
        assert_eq!(ms(10), 5_000);
    }
}
