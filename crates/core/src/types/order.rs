//! The order aggregate.
//!
//! An [`Order`] serializes to the same shape the ordering API accepts, so a
//! saved cart entry can be sent for pricing without any conversion.

use core::fmt;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::payment::OrderPayment;
use super::price::Price;
use crate::api::{CatalogError, OrderingApi};

/// Product customizations (toppings, sauces, ...) keyed by option code.
pub type Options = BTreeMap<String, serde_json::Value>;

/// A product as described by the ordering API's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog code, e.g. `12SCMEATZA`.
    pub code: String,
    /// Human readable name.
    pub name: String,
    /// Quantity used when the product is added to an order.
    #[serde(default = "default_quantity")]
    pub default_quantity: u32,
    /// Default options for the product.
    #[serde(default)]
    pub options: Options,
}

impl Product {
    /// Create a product with quantity 1 and no options.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            default_quantity: default_quantity(),
            options: Options::new(),
        }
    }
}

const fn default_quantity() -> u32 {
    1
}

/// One product within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItem {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Qty")]
    pub quantity: u32,
    #[serde(default)]
    pub options: Options,
}

impl From<&Product> for LineItem {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            quantity: product.default_quantity.max(1),
            options: product.options.clone(),
        }
    }
}

/// How the order gets to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceMethod {
    #[default]
    Carryout,
    Delivery,
}

impl ServiceMethod {
    /// The name used on the wire and in output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Carryout => "Carryout",
            Self::Delivery => "Delivery",
        }
    }
}

impl fmt::Display for ServiceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ServiceMethod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown service method: {0} (expected Carryout or Delivery)")]
pub struct ServiceMethodError(pub String);

impl FromStr for ServiceMethod {
    type Err = ServiceMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "carryout" => Ok(Self::Carryout),
            "delivery" => Ok(Self::Delivery),
            _ => Err(ServiceMethodError(s.to_owned())),
        }
    }
}

/// Delivery or billing address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

impl Address {
    /// The second address line: `"{city} {region}, {postal_code}"`.
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{} {}, {}", self.city, self.region, self.postal_code)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.street, self.locality())
    }
}

/// A pending order: line items plus where and how it is fulfilled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "StoreID")]
    pub store_id: String,
    #[serde(rename = "Products", default)]
    pub products: Vec<LineItem>,
    #[serde(rename = "ServiceMethod", default)]
    pub service_method: ServiceMethod,
    #[serde(rename = "Address", default)]
    pub address: Address,
}

impl Order {
    /// An empty order with no store, products or address.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty order for a specific store.
    #[must_use]
    pub fn for_store(store_id: impl Into<String>, service_method: ServiceMethod, address: Address) -> Self {
        Self {
            store_id: store_id.into(),
            products: Vec::new(),
            service_method,
            address,
        }
    }

    /// Append a product as a new line item.
    ///
    /// Adding the same code twice yields two line items.
    pub fn add_product(&mut self, product: &Product) {
        self.products.push(LineItem::from(product));
    }

    /// Returns `true` if the order has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Ask the ordering API what this order costs.
    ///
    /// # Errors
    ///
    /// Returns whatever the pricing lookup fails with.
    pub async fn price(&self, api: &impl OrderingApi) -> Result<Price, CatalogError> {
        api.price(self).await
    }

    /// Attach payments, producing the record sent when placing the order.
    #[must_use]
    pub fn into_submission(self, payments: Vec<OrderPayment>) -> Submission {
        Submission {
            order: SubmittedOrder {
                order: self,
                payments,
            },
        }
    }
}

/// The body of a place-order request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    #[serde(rename = "Order")]
    pub order: SubmittedOrder,
}

/// An order together with its payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedOrder {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "Payments")]
    pub payments: Vec<OrderPayment>,
}
