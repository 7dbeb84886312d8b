//! Command implementations.
//!
//! Commands take their collaborators (cart repository, ordering API, output
//! stream) as arguments so they can run against in-memory fakes.

pub mod cart;
pub mod checkout;

use dough_core::{CartError, CatalogError, StoreError};
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Cart lookup, validation or persistence failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<CatalogError> for CommandError {
    fn from(e: CatalogError) -> Self {
        Self::Cart(e.into())
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        Self::Cart(e.into())
    }
}

impl CommandError {
    /// Shorthand for a user input error.
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::Cart(CartError::user_input(message))
    }

    /// Returns `true` for mistakes in the command line itself.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(self, Self::Cart(CartError::UserInput(_)))
    }
}
