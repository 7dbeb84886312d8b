//! Core types for the dough cart.
//!
//! This module provides the order aggregate, payment cards and prices.

pub mod order;
pub mod payment;
pub mod price;

pub use order::{
    Address, LineItem, Options, Order, Product, ServiceMethod, ServiceMethodError, Submission,
    SubmittedOrder,
};
pub use payment::{
    Card, Expiration, OrderPayment, Payment, SavedCard, format_expiration, normalize,
    parse_expiration, to_payment,
};
pub use price::{CurrencyCode, Price};
