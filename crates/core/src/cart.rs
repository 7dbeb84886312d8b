//! Named orders persisted in a [`KeyValueStore`].
//!
//! Each order lives under [`ORDER_PREFIX`] followed by its user-chosen name,
//! encoded as JSON.

use crate::error::CartError;
use crate::store::{KeyValueStore, StoreError};
use crate::types::Order;

/// Prefix that namespaces order keys in the store.
pub const ORDER_PREFIX: &str = "user_order_";

/// Command word for creating orders; never valid as an order name.
pub const RESERVED_NAME: &str = "add";

/// Reject names that can never refer to an order.
///
/// # Errors
///
/// Returns [`CartError::UserInput`] for an empty name or [`RESERVED_NAME`].
pub fn validate_name(name: &str) -> Result<(), CartError> {
    if name.is_empty() {
        return Err(CartError::user_input("order name cannot be empty"));
    }
    if name == RESERVED_NAME {
        return Err(CartError::user_input(format!(
            "cannot use '{RESERVED_NAME}' as an order name"
        )));
    }
    Ok(())
}

/// Store key for an order name.
#[must_use]
pub fn order_key(name: &str) -> String {
    format!("{ORDER_PREFIX}{name}")
}

/// Maps order names to serialized orders in a key-value store.
#[derive(Debug, Clone, Default)]
pub struct CartRepository<S> {
    store: S,
}

impl<S: KeyValueStore> CartRepository<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load a saved order.
    ///
    /// # Errors
    ///
    /// - [`CartError::UserInput`] if the name is not a valid order name
    /// - [`CartError::NotFound`] if nothing is saved under the name
    /// - [`CartError::Deserialization`] if the saved bytes are not an order
    pub fn load(&self, name: &str) -> Result<Order, CartError> {
        validate_name(name)?;
        let raw = self
            .store
            .get(&order_key(name))?
            .ok_or_else(|| CartError::NotFound(name.to_owned()))?;
        serde_json::from_slice(&raw).map_err(|source| CartError::Deserialization {
            name: name.to_owned(),
            source,
        })
    }

    /// Save an order, replacing any order already saved under the name.
    ///
    /// # Errors
    ///
    /// - [`CartError::UserInput`] if the name is not a valid order name
    /// - [`CartError::Serialization`] if the order cannot be encoded
    /// - [`CartError::Store`] if the write fails
    pub fn save(&mut self, name: &str, order: &Order) -> Result<(), CartError> {
        validate_name(name)?;
        let raw = serde_json::to_vec(order).map_err(CartError::Serialization)?;
        self.store.put(&order_key(name), &raw)?;
        Ok(())
    }

    /// Delete a saved order.
    ///
    /// # Errors
    ///
    /// - [`CartError::UserInput`] if the name is not a valid order name
    /// - [`CartError::NotFound`] if nothing is saved under the name
    pub fn delete(&mut self, name: &str) -> Result<(), CartError> {
        validate_name(name)?;
        match self.store.delete(&order_key(name)) {
            Err(StoreError::NotFound(_)) => Err(CartError::NotFound(name.to_owned())),
            other => other.map_err(CartError::from),
        }
    }

    /// Returns `true` if an order is saved under the name.
    ///
    /// # Errors
    ///
    /// - [`CartError::UserInput`] if the name is not a valid order name
    /// - [`CartError::Store`] if the store cannot be read
    pub fn exists(&self, name: &str) -> Result<bool, CartError> {
        validate_name(name)?;
        Ok(self.store.get(&order_key(name))?.is_some())
    }

    /// Names of all saved orders, in store iteration order.
    ///
    /// Keys outside the order namespace are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_all(&self) -> Result<Vec<String>, CartError> {
        Ok(self
            .store
            .get_all()?
            .into_iter()
            .filter_map(|(key, _)| key.strip_prefix(ORDER_PREFIX).map(str::to_owned))
            .collect())
    }
}
