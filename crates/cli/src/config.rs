//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `DOUGH_DATA_FILE` - Cart file (default: `$HOME/.dough/cart.json`)
//! - `DOUGH_API_URL` - Ordering API base URL (default: <https://order.dominos.com>)
//! - `DOUGH_STORE_ID` - Store new orders are placed with (default: 4336)
//! - `DOUGH_SERVICE_METHOD` - `Carryout` or `Delivery` (default: Carryout)
//! - `DOUGH_ADDRESS_STREET` - Street line of the customer address
//! - `DOUGH_ADDRESS_CITY` - City
//! - `DOUGH_ADDRESS_REGION` - State or province
//! - `DOUGH_ADDRESS_POSTAL_CODE` - Postal code
//!
//! A `.env` file in the working directory is loaded first if present.

use std::path::PathBuf;

use dough_core::{Address, ServiceMethod};
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://order.dominos.com";
const DEFAULT_STORE_ID: &str = "4336";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where saved orders are kept
    pub data_file: PathBuf,
    /// Ordering API base URL
    pub api_url: Url,
    /// Store that new orders are bound to
    pub store_id: String,
    /// Service method for new orders
    pub service_method: ServiceMethod,
    /// Customer address for new orders
    pub address: Address,
}

impl CliConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unusable value, or if no data
    /// file is configured and `HOME` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`CliConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_file = match lookup("DOUGH_DATA_FILE") {
            Some(path) => PathBuf::from(path),
            None => lookup("HOME")
                .map(|home| PathBuf::from(home).join(".dough").join("cart.json"))
                .ok_or_else(|| ConfigError::MissingEnvVar("DOUGH_DATA_FILE".to_string()))?,
        };

        let api_url = lookup("DOUGH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("DOUGH_API_URL".to_string(), e.to_string()))?;
        // Endpoints are joined as relative paths, which replace a last segment
        // that has no trailing slash.
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let service_method = lookup("DOUGH_SERVICE_METHOD")
            .map(|method| method.parse::<ServiceMethod>())
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DOUGH_SERVICE_METHOD".to_string(), e.to_string())
            })?
            .unwrap_or_default();

        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let address = Address {
            street: get("DOUGH_ADDRESS_STREET", "1600 Pennsylvania Ave NW"),
            city: get("DOUGH_ADDRESS_CITY", "Washington"),
            region: get("DOUGH_ADDRESS_REGION", "DC"),
            postal_code: get("DOUGH_ADDRESS_POSTAL_CODE", "20500"),
        };

        Ok(Self {
            data_file,
            api_url,
            store_id: get("DOUGH_STORE_ID", DEFAULT_STORE_ID),
            service_method,
            address,
        })
    }
}
