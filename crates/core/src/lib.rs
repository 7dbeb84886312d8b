//! Dough Core - order, payment and cart types.
//!
//! This crate provides everything the `dough` CLI knows about orders without
//! doing any I/O itself:
//! - [`types`] - Orders, line items, payment cards and prices
//! - [`cart`] - Named orders persisted in a key-value store
//! - [`format`] - The human readable order report
//! - [`store`] - The key-value store trait and an in-memory store
//! - [`api`] - The ordering API trait (catalog, pricing, submission)
//!
//! # Architecture
//!
//! Storage backends and the HTTP client live in the CLI crate and plug in
//! through [`store::KeyValueStore`] and [`api::OrderingApi`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod error;
pub mod format;
pub mod store;
pub mod types;

pub use api::{CatalogError, OrderingApi};
pub use cart::{CartRepository, ORDER_PREFIX, RESERVED_NAME};
pub use error::CartError;
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use types::*;
