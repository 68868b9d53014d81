//! Error types for the gemini-feed crate.
//!
//! This module defines the errors that can occur while subscribing to
//! and consuming the market data feed. Decode failures of individual
//! feed messages are deliberately not represented here: they are
//! recovered where they happen and never propagate.

use thiserror::Error;

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Writing to the output sink failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket connection closed unexpectedly
    #[error("WebSocket connection closed")]
    ConnectionClosed,

    /// Invalid configuration (bad symbol, bad depth)
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("display depth must be at least 1".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_io_error_preserves_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe gone");
        let err = Error::from(inner);
        assert!(err.to_string().contains("pipe gone"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_connection_closed_display() {
        assert_eq!(
            Error::ConnectionClosed.to_string(),
            "WebSocket connection closed"
        );
    }
}
