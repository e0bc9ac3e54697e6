//! Error types for the planning poker client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error (failed connect, mid-session transport failure)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// All reconnect attempts were exhausted
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),

    /// The durable client identity could not be loaded or persisted
    #[error("Client identity error: {0}")]
    Identity(String),
}
