//! Type-safe price representation using decimal arithmetic.
//!
//! The ordering API reports totals as floating-point numbers. They are
//! converted to [`Decimal`] once, at the boundary, and rounded to cents so
//! that everything downstream (rendering, submission amounts) works with
//! exact values.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from a floating-point amount, rounded to cents.
    ///
    /// Returns `None` for NaN or infinite input.
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        let amount = Decimal::from_f64_retain(amount)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Some(Self::new(amount, CurrencyCode::USD))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// The symbol printed in front of an amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_rounds_to_cents() {
        let price = Price::from_f64(34.069_999_999).unwrap();
        assert_eq!(price.amount, Decimal::new(3407, 2));
        assert_eq!(price.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert!(Price::from_f64(f64::NAN).is_none());
        assert!(Price::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_display_pads_to_two_places() {
        let price = Price::new(Decimal::new(19, 0), CurrencyCode::USD);
        assert_eq!(price.display(), "$19.00");
        assert_eq!(format!("{price}"), "$19.00");
    }

    #[test]
    fn test_display_fractional() {
        let price = Price::from_f64(34.07).unwrap();
        assert_eq!(price.display(), "$34.07");
    }
}
