//! The stream-to-book pipeline.
//!
//! [`FeedClient`] owns the bid and ask ladders for one symbol plus the
//! output sink, and turns each inbound message into at most one render:
//! decode the events, apply them in order, and redraw the top of the
//! book when a change landed within the displayed depth.
//!
//! Renders and connection banners go to the sink; diagnostics go to the
//! `tracing` subscriber, so a terminal viewer keeps a clean book on
//! stdout with noise routed to stderr.

use std::io::Write;

use tracing::{debug, error, info};

use crate::client::websocket::{ReconnectConfig, ReconnectingSocket, SessionEvent};
use crate::config::Subscription;
use crate::error::Error;
use crate::orderbook::{Ladder, Side};
use crate::types::messages::{BookEvent, MarketDataMessage};

/// What [`FeedClient::handle_text`] did with one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The book changed within the displayed depth; a render was written
    Rendered,
    /// The book changed strictly deeper than the displayed rows; the
    /// visible rows are untouched, so no render was written
    Skipped,
    /// The message was undecodable or produced no book change; it was
    /// dropped with a diagnostic
    Rejected,
}

/// Live book view for one symbol, written to an output sink
///
/// The client applies every decoded event to the matching [`Ladder`]
/// and tracks the maximum 1-based depth any event touched. A message
/// renders if and only if that depth is within the configured display
/// depth: a change strictly deeper than the visible rows cannot move
/// them, so redrawing would be redundant output.
///
/// # Example
///
/// ```rust
/// use gemini_feed::{FeedClient, MessageOutcome, Subscription};
///
/// let sub = Subscription::new("btcusd", 2).unwrap();
/// let mut client = FeedClient::new(sub, Vec::new());
///
/// let outcome = client
///     .handle_text(r#"{"events":[{"side":"bid","price":"97001.25","remaining":"0.5"}]}"#)
///     .unwrap();
/// assert_eq!(outcome, MessageOutcome::Rendered);
///
/// let shown = String::from_utf8(client.output().clone()).unwrap();
/// assert!(shown.contains("97001.25"));
/// ```
pub struct FeedClient<W: Write> {
    /// Symbol, depth, endpoint and precision, fixed at construction
    subscription: Subscription,
    /// Buy side of the book
    bids: Ladder,
    /// Sell side of the book
    asks: Ladder,
    /// Where renders and connection banners are written
    out: W,
}

impl<W: Write> std::fmt::Debug for FeedClient<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("symbol", &self.subscription.symbol())
            .field("display_depth", &self.subscription.display_depth())
            .field("bid_levels", &self.bids.len())
            .field("ask_levels", &self.asks.len())
            .finish()
    }
}

impl<W: Write> FeedClient<W> {
    /// Create a client for one subscription, writing to `out`
    pub fn new(subscription: Subscription, out: W) -> Self {
        Self {
            subscription,
            bids: Ladder::new(Side::Bid),
            asks: Ladder::new(Side::Ask),
            out,
        }
    }

    /// Get the subscription this client serves
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Get the buy side of the book
    pub fn bids(&self) -> &Ladder {
        &self.bids
    }

    /// Get the sell side of the book
    pub fn asks(&self) -> &Ladder {
        &self.asks
    }

    /// Get the output sink
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the feed until the session ends
    ///
    /// Connects to the subscription endpoint and processes session
    /// events until the transport gives up reconnecting (with the
    /// default infinite policy, this future only ends by being
    /// dropped). Dropping it is a complete teardown: no callback or
    /// task keeps running behind it.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial connection fails, the sink
    /// rejects a write, or the retry budget is exhausted.
    pub async fn run(&mut self) -> Result<(), Error> {
        let url = self.subscription.url().clone();
        let mut socket = ReconnectingSocket::connect(url, ReconnectConfig::default()).await?;

        while let Some(event) = socket.next().await {
            match event {
                SessionEvent::Open => self.session_opened()?,
                SessionEvent::Message(text) => {
                    self.handle_text(&text)?;
                }
                SessionEvent::Closed => self.session_closed()?,
            }
        }

        Err(Error::ConnectionClosed)
    }

    /// Apply one raw feed message to the book
    ///
    /// Decode failures and no-op messages are recovered here: the
    /// payload is dropped with a diagnostic and the next message
    /// proceeds as if nothing happened.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing a render to the sink fails.
    pub fn handle_text(&mut self, text: &str) -> Result<MessageOutcome, Error> {
        let message: MarketDataMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, payload = %text, "dropping undecodable message");
                return Ok(MessageOutcome::Rejected);
            }
        };

        let mut max_depth = 0;
        for event in &message.events {
            max_depth = max_depth.max(self.apply_event(event));
        }

        if max_depth == 0 {
            error!(payload = %text, "message produced no book change");
            return Ok(MessageOutcome::Rejected);
        }

        if max_depth > self.subscription.display_depth() {
            return Ok(MessageOutcome::Skipped);
        }

        self.render()?;
        Ok(MessageOutcome::Rendered)
    }

    /// Apply one event to its side's ladder
    ///
    /// Returns the 1-based depth the event touched, 0 when the event is
    /// malformed or changed nothing. A malformed event never aborts its
    /// siblings, and reporting it stays below the default log level so a
    /// fully damaged message still surfaces as one diagnostic, not one
    /// per event.
    fn apply_event(&mut self, event: &BookEvent) -> usize {
        let (side, price, quantity) =
            match (event.book_side(), event.price(), event.remaining()) {
                (Some(side), Some(price), Some(quantity)) => (side, price, quantity),
                _ => {
                    debug!(event = ?event, "skipping malformed event");
                    return 0;
                }
            };

        match side {
            Side::Bid => self.bids.upsert(price, quantity),
            Side::Ask => self.asks.upsert(price, quantity),
        }
    }

    /// Write one full redraw of the top of the book
    ///
    /// Exactly `display_depth` rows, the Nth-best bid against the
    /// Nth-best ask, a sentinel where a side runs out of levels, and a
    /// trailing blank line. Every render is independent output; no line
    /// is ever edited in place.
    fn render(&mut self) -> Result<(), Error> {
        let precision = self.subscription.price_precision();
        let mut bid = self.bids.iter();
        let mut ask = self.asks.iter();

        for _ in 0..self.subscription.display_depth() {
            match bid.next() {
                Some(level) => write!(
                    self.out,
                    "{:.p$} {:16.9}",
                    level.price,
                    level.quantity,
                    p = precision
                )?,
                None => write!(self.out, "NO BID")?,
            }

            write!(self.out, "\t|\t")?;

            match ask.next() {
                Some(level) => write!(
                    self.out,
                    "{:.p$} {:16.9}",
                    level.price,
                    level.quantity,
                    p = precision
                )?,
                None => write!(self.out, "NO ASK")?,
            }

            writeln!(self.out)?;
        }

        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    /// Announce an established session on the sink
    fn session_opened(&mut self) -> Result<(), Error> {
        info!(url = %self.subscription.url(), "feed session open");
        writeln!(self.out, "Connection opened to {}", self.subscription.url())?;
        writeln!(
            self.out,
            "Receiving symbol \"{}\"",
            self.subscription.symbol()
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Announce a lost session on the sink
    fn session_closed(&mut self) -> Result<(), Error> {
        info!(url = %self.subscription.url(), "feed session closed");
        writeln!(
            self.out,
            "Connection closed! ({})",
            self.subscription.url()
        )?;
        self.out.flush()?;
        Ok(())
    }
}
