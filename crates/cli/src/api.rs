//! HTTP client for the ordering API.
//!
//! Speaks the `/power` endpoints: the store menu for product lookups,
//! `price-order` for totals and `place-order` for submission. The menu is
//! fetched at most once per client.

use std::collections::HashMap;

use dough_core::{
    Address, CatalogError, Order, OrderingApi, Price, Product, ServiceMethod, Submission,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CliConfig;

const USER_AGENT: &str = concat!("dough/", env!("CARGO_PKG_VERSION"));
const REFERER_URL: &str = "https://order.dominos.com/en/pages/order/";

/// Status code the API uses to reject a request.
const STATUS_FAILURE: i64 = -1;

/// Ordering API client bound to one store.
#[derive(Debug)]
pub struct HttpOrderingApi {
    client: reqwest::Client,
    base_url: Url,
    store_id: String,
    service_method: ServiceMethod,
    address: Address,
    menu: OnceCell<HashMap<String, Product>>,
}

impl HttpOrderingApi {
    /// Create a client from CLI configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CliConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(request_error)?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            store_id: config.store_id.clone(),
            service_method: config.service_method,
            address: config.address.clone(),
            menu: OnceCell::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::Request(format!("bad endpoint {path}: {e}")))
    }

    #[instrument(skip(self), fields(store_id = %self.store_id))]
    async fn fetch_menu(&self) -> Result<HashMap<String, Product>, CatalogError> {
        let mut url = self.endpoint(&format!("power/store/{}/menu", self.store_id))?;
        url.query_pairs_mut()
            .append_pair("lang", "en")
            .append_pair("structured", "true");

        let menu: MenuResponse = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_error)?
            .json()
            .await
            .map_err(response_error)?;

        debug!(variants = menu.variants.len(), "fetched menu");
        Ok(menu
            .variants
            .into_iter()
            .map(|(code, variant)| {
                let product = Product::new(code.clone(), variant.name);
                (code, product)
            })
            .collect())
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, CatalogError> {
        let response: ApiResponse = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_error)?
            .json()
            .await
            .map_err(response_error)?;

        if response.status == STATUS_FAILURE {
            return Err(CatalogError::Rejected(response.status_codes()));
        }
        Ok(response)
    }
}

impl OrderingApi for HttpOrderingApi {
    fn new_order(&self) -> Order {
        Order::for_store(self.store_id.clone(), self.service_method, self.address.clone())
    }

    async fn product(&self, code: &str) -> Result<Product, CatalogError> {
        let menu = self.menu.get_or_try_init(|| self.fetch_menu()).await?;
        menu.get(code)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(code.to_owned()))
    }

    #[instrument(skip_all, fields(store_id = %order.store_id, products = order.products.len()))]
    async fn price(&self, order: &Order) -> Result<Price, CatalogError> {
        let response = self
            .post("power/price-order", &OrderEnvelope { order })
            .await?;
        let amount = response
            .order
            .and_then(|o| o.amounts)
            .map(|a| a.customer)
            .ok_or_else(|| CatalogError::Response("price response has no amounts".to_owned()))?;
        debug!(amount, "priced order");
        Price::from_f64(amount)
            .ok_or_else(|| CatalogError::Response(format!("unusable amount {amount}")))
    }

    #[instrument(skip_all, fields(store_id = %submission.order.order.store_id))]
    async fn place(&self, submission: &Submission) -> Result<(), CatalogError> {
        self.post("power/place-order", submission).await?;
        Ok(())
    }
}

fn request_error(e: reqwest::Error) -> CatalogError {
    CatalogError::Request(e.to_string())
}

fn response_error(e: reqwest::Error) -> CatalogError {
    CatalogError::Response(e.to_string())
}

#[derive(Serialize)]
struct OrderEnvelope<'a> {
    #[serde(rename = "Order")]
    order: &'a Order,
}

#[derive(Debug, Deserialize)]
struct MenuResponse {
    #[serde(rename = "Variants", default)]
    variants: HashMap<String, MenuVariant>,
}

#[derive(Debug, Deserialize)]
struct MenuVariant {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "Status", default)]
    status: i64,
    #[serde(rename = "StatusItems", default)]
    status_items: Vec<StatusItem>,
    #[serde(rename = "Order")]
    order: Option<ApiOrder>,
}

impl ApiResponse {
    fn status_codes(&self) -> String {
        if self.status_items.is_empty() {
            return "no reason given".to_owned();
        }
        self.status_items
            .iter()
            .map(|item| item.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Deserialize)]
struct StatusItem {
    #[serde(rename = "Code")]
    code: String,
}

#[derive(Debug, Deserialize)]
struct ApiOrder {
    #[serde(rename = "Amounts")]
    amounts: Option<Amounts>,
}

#[derive(Debug, Deserialize)]
struct Amounts {
    #[serde(rename = "Customer")]
    customer: f64,
}
