//! Client error types
//!
//! Nothing here is fatal: every failure degrades to "keep last-known
//! state and notify". Cancellation and not-found are normal outcomes
//! under concurrent pushes and are swallowed at the call sites.

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cart selection rejected (bad quantity, unavailable product, or an
    /// option outside the product's attached groups)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Fetch failed at the network layer
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request superseded or cancelled; resolves silently
    #[error("Request cancelled")]
    Cancelled,

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected response shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
