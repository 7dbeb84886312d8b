//! Integration test support for dough.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dough-integration-tests
//! ```
//!
//! # Contents
//!
//! - [`FakeOrderingApi`] - In-memory ordering API with a small fixed menu
//! - [`TempNames`] - Unique scratch file and directory names
//!
//! Nothing here touches the network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use dough_core::{
    Address, CatalogError, Order, OrderingApi, Price, Product, ServiceMethod, Submission,
};

/// Store id of every order created by [`FakeOrderingApi`].
pub const STORE_ID: &str = "4336";

/// The address every fake order is bound to.
#[must_use]
pub fn white_house() -> Address {
    Address {
        street: "1600 Pennsylvania Ave NW".to_owned(),
        city: "Washington".to_owned(),
        region: "DC".to_owned(),
        postal_code: "20500".to_owned(),
    }
}

// =============================================================================
// Fake ordering API
// =============================================================================

/// Ordering API fake with a fixed menu and a fixed total.
#[derive(Debug)]
pub struct FakeOrderingApi {
    menu: HashMap<String, Product>,
    total: Option<f64>,
    placed: RefCell<Vec<serde_json::Value>>,
}

impl Default for FakeOrderingApi {
    fn default() -> Self {
        let menu = [
            ("12SCMEATZA", "Medium (12\") Hand Tossed MeatZZa™"),
            ("W08PBNLW", "8-Piece Boneless Chicken"),
            ("W08PPLNW", "8-piece Plain Wings"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_owned(), Product::new(code, name)))
        .collect();

        Self {
            menu,
            total: Some(34.07),
            placed: RefCell::new(Vec::new()),
        }
    }
}

impl FakeOrderingApi {
    /// A fake whose pricing endpoint always fails.
    #[must_use]
    pub fn without_pricing() -> Self {
        Self {
            total: None,
            ..Self::default()
        }
    }

    /// Bodies of every order placed so far, as JSON.
    #[must_use]
    pub fn placed(&self) -> Vec<serde_json::Value> {
        self.placed.borrow().clone()
    }
}

impl OrderingApi for FakeOrderingApi {
    fn new_order(&self) -> Order {
        Order::for_store(STORE_ID, ServiceMethod::Carryout, white_house())
    }

    async fn product(&self, code: &str) -> Result<Product, CatalogError> {
        self.menu
            .get(code)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(code.to_owned()))
    }

    async fn price(&self, _order: &Order) -> Result<Price, CatalogError> {
        self.total
            .and_then(Price::from_f64)
            .ok_or_else(|| CatalogError::Request("pricing unavailable".to_owned()))
    }

    async fn place(&self, submission: &Submission) -> Result<(), CatalogError> {
        let body =
            serde_json::to_value(submission).map_err(|e| CatalogError::Response(e.to_string()))?;
        self.placed.borrow_mut().push(body);
        Ok(())
    }
}

// =============================================================================
// Temporary names
// =============================================================================

/// Generates scratch paths that do not exist yet.
///
/// The sequence comes from a linear congruential generator whose state lives
/// in this value, so tests that need reproducible names can seed it and
/// tests running in parallel never share it.
#[derive(Debug, Clone)]
pub struct TempNames {
    dir: PathBuf,
    state: u32,
}

impl Default for TempNames {
    fn default() -> Self {
        Self::new()
    }
}

impl TempNames {
    /// Attempts before giving up on finding an unused name.
    const MAX_ATTEMPTS: usize = 1000;

    /// Names under the system temp directory, seeded from the clock and pid.
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.subsec_nanos());
        Self::with_seed(std::env::temp_dir(), nanos ^ std::process::id())
    }

    /// Names under `dir`, with an explicit seed.
    #[must_use]
    pub fn with_seed(dir: impl Into<PathBuf>, seed: u32) -> Self {
        Self {
            dir: dir.into(),
            state: seed,
        }
    }

    /// The next nine digit name in the sequence.
    pub fn next_name(&mut self) -> String {
        // constants from Numerical Recipes
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        format!("{:09}", self.state % 1_000_000_000)
    }

    /// A path `<dir>/<prefix><random><suffix>` that does not exist.
    ///
    /// After too many collisions the last candidate is returned anyway.
    pub fn path(&mut self, prefix: &str, suffix: &str) -> PathBuf {
        let name = self.next_name();
        let mut candidate = self.dir.join(format!("{prefix}{name}{suffix}"));
        for _ in 1..Self::MAX_ATTEMPTS {
            if !candidate.exists() {
                break;
            }
            let name = self.next_name();
            candidate = self.dir.join(format!("{prefix}{name}{suffix}"));
        }
        candidate
    }

    /// Create a fresh directory and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn dir(&mut self, prefix: &str) -> std::io::Result<PathBuf> {
        let dir = self.path(prefix, "");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// The directory names are generated under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.dir
    }
}
