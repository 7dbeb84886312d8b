//! Cart errors.

use thiserror::Error;

use crate::api::CatalogError;
use crate::store::StoreError;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The request itself is unusable (bad or missing order name, ...).
    #[error("{0}")]
    UserInput(String),

    /// No order is saved under this name.
    #[error("cannot find order {0}")]
    NotFound(String),

    /// The order could not be encoded; nothing was written.
    #[error("failed to encode order: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The stored bytes do not describe an order.
    #[error("failed to decode order {name}: {source}")]
    Deserialization {
        /// Order name.
        name: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A product lookup or price computation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The key-value store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CartError {
    /// Shorthand for [`CartError::UserInput`].
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput(message.into())
    }
}
