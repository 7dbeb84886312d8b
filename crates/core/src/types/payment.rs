//! Payment cards and their normalization into the ordering API's wire format.
//!
//! Anything that can answer [`Card`] can be turned into an [`OrderPayment`]:
//! a card typed in on the command line ([`Payment`]) or one loaded from a
//! saved profile ([`SavedCard`]).
//!
//! Expiration handling is deliberately forgiving. Malformed expiration text
//! never produces an error; it becomes [`Expiration::Invalid`], which callers
//! check for before submitting.

use core::fmt;

use chrono::{Datelike, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::price::Price;

/// Payment type tag sent with every card payment.
pub const CREDIT_CARD: &str = "CreditCard";

/// A credit or debit card.
pub trait Card {
    /// The card number.
    fn num(&self) -> &SecretString;

    /// The month the card expires.
    fn expires_on(&self) -> Expiration;

    /// The security code (CVV). Kept as text so leading zeros survive.
    fn code(&self) -> &SecretString;

    /// The card number with everything but the last four digits hidden.
    fn masked_num(&self) -> String {
        mask_number(self.num().expose_secret())
    }
}

/// Card expiration month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// Expires at the end of the month containing this date (always day 1).
    On(NaiveDate),
    /// The expiration text could not be understood.
    Invalid,
}

impl Expiration {
    /// Build an expiration from a month (1-12) and a full year.
    #[must_use]
    pub fn from_month_year(month: u32, year: i32) -> Self {
        NaiveDate::from_ymd_opt(year, month, 1).map_or(Self::Invalid, Self::On)
    }

    /// Parse `MM/YY` or `MM/YYYY` text.
    ///
    /// Years shorter than four characters are taken to be in the 2000s.
    /// Anything other than exactly two `/`-separated integers, or a month
    /// outside 1-12, yields [`Expiration::Invalid`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split('/');
        let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Self::Invalid;
        };

        let Ok(month) = month.parse::<u32>() else {
            return Self::Invalid;
        };
        let year = if year.len() < 4 {
            format!("20{year}")
        } else {
            year.to_owned()
        };
        let Ok(year) = year.parse::<i32>() else {
            return Self::Invalid;
        };

        Self::from_month_year(month, year)
    }

    /// Returns `true` unless this is [`Expiration::Invalid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::On(_))
    }

    /// Format as `MMYY`.
    ///
    /// Years with four or more digits are cut to their last two. An invalid
    /// expiration formats as `"0000"`.
    #[must_use]
    pub fn format(&self) -> String {
        match self {
            Self::On(date) => {
                let year = date.year().to_string();
                let short = if year.len() >= 4 {
                    year.get(year.len() - 2..).unwrap_or(&year)
                } else {
                    &year
                };
                format!("{:02}{short}", date.month())
            }
            Self::Invalid => "0000".to_owned(),
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Parse expiration text. See [`Expiration::parse`].
#[must_use]
pub fn parse_expiration(text: &str) -> Expiration {
    Expiration::parse(text)
}

/// Format an expiration as `MMYY`. See [`Expiration::format`].
#[must_use]
pub fn format_expiration(expiration: &Expiration) -> String {
    expiration.format()
}

/// A card as typed in by the user.
#[derive(Clone)]
pub struct Payment {
    /// The card number.
    pub number: SecretString,
    /// Expiration formatted exactly as it is on the physical card.
    pub expiration: String,
    /// Card type tag.
    pub card_type: String,
    /// Security code.
    pub security_code: SecretString,
}

impl Payment {
    /// Create a card from user input.
    ///
    /// Returns `None` when the expiration text is too short or too long to
    /// be `M/YY` through `MM/YYYY`. The contents are not validated further;
    /// see [`Card::expires_on`].
    #[must_use]
    pub fn new(
        number: impl Into<SecretString>,
        expiration: &str,
        security_code: impl Into<SecretString>,
    ) -> Option<Self> {
        if !(4..=7).contains(&expiration.len()) {
            return None;
        }
        Some(Self {
            number: number.into(),
            expiration: expiration.to_owned(),
            card_type: String::new(),
            security_code: security_code.into(),
        })
    }
}

impl Card for Payment {
    fn num(&self) -> &SecretString {
        &self.number
    }

    fn expires_on(&self) -> Expiration {
        Expiration::parse(&self.expiration)
    }

    fn code(&self) -> &SecretString {
        &self.security_code
    }
}

impl fmt::Debug for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payment")
            .field("number", &self.masked_num())
            .field("expiration", &self.expiration)
            .field("card_type", &self.card_type)
            .field("security_code", &"[REDACTED]")
            .finish()
    }
}

/// Re-express any card as a [`Payment`] with an `MMYY` expiration.
#[must_use]
pub fn to_payment(card: &impl Card) -> Payment {
    Payment {
        number: card.num().clone(),
        expiration: card.expires_on().format(),
        card_type: String::new(),
        security_code: card.code().clone(),
    }
}

/// A card loaded from a saved profile, with its expiration already parsed.
#[derive(Clone)]
pub struct SavedCard {
    number: SecretString,
    expiration: Expiration,
    security_code: SecretString,
}

impl SavedCard {
    /// Create a saved card.
    #[must_use]
    pub fn new(
        number: impl Into<SecretString>,
        expiration: Expiration,
        security_code: impl Into<SecretString>,
    ) -> Self {
        Self {
            number: number.into(),
            expiration,
            security_code: security_code.into(),
        }
    }
}

impl Card for SavedCard {
    fn num(&self) -> &SecretString {
        &self.number
    }

    fn expires_on(&self) -> Expiration {
        self.expiration
    }

    fn code(&self) -> &SecretString {
        &self.security_code
    }
}

impl fmt::Debug for SavedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedCard")
            .field("number", &self.masked_num())
            .field("expiration", &self.expiration)
            .field("security_code", &"[REDACTED]")
            .finish()
    }
}

/// A card payment in the exact layout the ordering API expects.
///
/// [`normalize`] fills in the card fields. The amount, provider id and
/// one-time token belong to the submission and are set by the caller.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderPayment {
    pub number: String,
    /// `MMYY`.
    pub expiration: String,
    pub security_code: String,
    #[serde(rename = "Type")]
    pub payment_type: String,
    pub card_type: String,
    pub postal_code: String,
    pub amount: f64,
    #[serde(rename = "ProviderID")]
    pub provider_id: String,
    #[serde(rename = "OTP")]
    pub otp: String,
    #[serde(rename = "gpmPaymentType")]
    pub gpm_payment_type: String,
}

impl OrderPayment {
    /// Set the amount charged to this card.
    #[must_use]
    pub fn with_amount(mut self, price: &Price) -> Self {
        use rust_decimal::prelude::ToPrimitive;

        self.amount = price.amount.to_f64().unwrap_or_default();
        self
    }

    /// Set the billing postal code.
    #[must_use]
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = postal_code.into();
        self
    }
}

impl fmt::Debug for OrderPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderPayment")
            .field("number", &mask_number(&self.number))
            .field("expiration", &self.expiration)
            .field("security_code", &"[REDACTED]")
            .field("payment_type", &self.payment_type)
            .field("card_type", &self.card_type)
            .field("postal_code", &self.postal_code)
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

/// Normalize a card into an [`OrderPayment`]. Never fails.
///
/// This is where the card details leave their [`SecretString`] wrappers: the
/// result is the plain wire record sent to the ordering API.
#[must_use]
pub fn normalize(card: &impl Card) -> OrderPayment {
    let number = card.num().expose_secret();
    OrderPayment {
        number: number.to_owned(),
        expiration: card.expires_on().format(),
        security_code: card.code().expose_secret().to_owned(),
        payment_type: CREDIT_CARD.to_owned(),
        card_type: card_brand(number).to_owned(),
        postal_code: String::new(),
        amount: 0.0,
        provider_id: String::new(),
        otp: String::new(),
        gpm_payment_type: String::new(),
    }
}

/// Guess the card network from the number's leading digits.
///
/// Returns an empty string when the prefix is not recognized.
#[must_use]
pub fn card_brand(number: &str) -> &'static str {
    let digits: String = number.chars().filter(char::is_ascii_digit).take(4).collect();
    let two = digits.get(..2).unwrap_or_default();

    if digits.starts_with('4') {
        "VISA"
    } else if matches!(two, "51" | "52" | "53" | "54" | "55") {
        "MASTERCARD"
    } else if matches!(two, "34" | "37") {
        "AMEX"
    } else if digits.starts_with("6011") || two == "65" {
        "DISCOVER"
    } else {
        ""
    }
}

fn mask_number(number: &str) -> String {
    let len = number.chars().count();
    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 < len { '*' } else { c })
        .collect()
}
