//! Error types for the purchase capability.

use thiserror::Error;

/// Result type alias for purchase capability operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures reported by a [`PurchaseClient`](crate::PurchaseClient).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The product was never loaded, so it cannot be bought.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The purchase itself failed.
    #[error("{message}")]
    Purchase {
        /// Human-readable reason
        message: String,
    },

    /// Product metadata could not be fetched (network or store failure).
    #[error("{message}")]
    Fetch {
        /// Human-readable reason
        message: String,
    },
}

impl ClientError {
    /// Creates a [`ClientError::Purchase`]
    #[must_use]
    pub fn purchase(message: impl Into<String>) -> Self {
        Self::Purchase {
            message: message.into(),
        }
    }

    /// Creates a [`ClientError::Fetch`]
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}
