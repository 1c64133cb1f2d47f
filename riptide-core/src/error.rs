//! Error types for riptide-core

use thiserror::Error;

/// Result type alias for riptide-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The first element of an incoming frame is not a known envelope label
    #[error("unknown message")]
    UnknownMessage,

    /// The envelope label was recognized but the payload did not decode
    #[error("parse message: {0}")]
    ParseMessage(String),

    /// The connection died before the operation could complete
    #[error("connection closed")]
    Disconnected,

    /// The relay answered the publish with `OK false`
    #[error("publish rejected: {0}")]
    PublishRejected(String),

    /// The caller's cancellation fired before the operation ran
    #[error("operation cancelled")]
    Cancelled,

    /// Schnorr signature creation or verification failed
    #[error("signature: {0}")]
    Signature(String),

    /// Malformed event
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Malformed filter
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The relay URL could not be parsed or normalized
    #[error("invalid relay url: {0}")]
    InvalidUrl(String),

    /// JSON encoding or decoding error
    #[error("JSON failed: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket transport error
    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
