//! The remote ordering API as seen by the cart.
//!
//! Implementations live outside this crate (the CLI ships an HTTP client);
//! tests substitute in-memory fakes.

use thiserror::Error;

use crate::types::{Order, Price, Product, Submission};

/// Errors from catalog lookups, pricing and order placement.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The store's menu has no product with this code.
    #[error("cannot find product {0}")]
    ProductNotFound(String),

    /// The API answered but refused the request.
    #[error("ordering API rejected the request: {0}")]
    Rejected(String),

    /// The request never got a usable answer.
    #[error("ordering API request failed: {0}")]
    Request(String),

    /// The answer could not be understood.
    #[error("invalid ordering API response: {0}")]
    Response(String),
}

/// Catalog, pricing and submission capabilities of the ordering API.
#[allow(async_fn_in_trait)]
pub trait OrderingApi {
    /// An empty order bound to the configured store, service method and
    /// address.
    fn new_order(&self) -> Order;

    /// Look up a product by catalog code.
    async fn product(&self, code: &str) -> Result<Product, CatalogError>;

    /// Compute the total for an order.
    async fn price(&self, order: &Order) -> Result<Price, CatalogError>;

    /// Place an order.
    async fn place(&self, submission: &Submission) -> Result<(), CatalogError>;
}

/// Look up every code, in order, stopping at the first failure.
///
/// Callers add the returned products only once all lookups succeeded, so a
/// bad code never leaves an order half updated.
///
/// # Errors
///
/// Returns the first lookup error.
pub async fn lookup_products<A, S>(api: &A, codes: &[S]) -> Result<Vec<Product>, CatalogError>
where
    A: OrderingApi,
    S: AsRef<str>,
{
    let mut products = Vec::with_capacity(codes.len());
    for code in codes {
        products.push(api.product(code.as_ref()).await?);
    }
    Ok(products)
}
