//! Paying for and placing a saved order.
//!
//! # Usage
//!
//! ```bash
//! # Preview: prices the order and shows the normalized card, sends nothing
//! dough checkout dinner --number 4111111111111111 --expiration 12/25 --code 123
//!
//! # Place the order
//! dough checkout dinner --number 4111111111111111 --expiration 12/25 --code 123 --yes
//! ```
//!
//! # Environment Variables
//!
//! - `DOUGH_CARD_NUMBER`, `DOUGH_CARD_EXPIRATION`, `DOUGH_CARD_CODE` stand in
//!   for the matching flags.

use std::convert::Infallible;
use std::io::Write;

use clap::Args;
use dough_core::cart::validate_name;
use dough_core::{Card, CartRepository, KeyValueStore, OrderingApi, Payment, normalize};
use secrecy::SecretString;
use tracing::info;

use super::CommandError;

/// Arguments for `dough checkout`.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Order to place
    #[arg(value_name = "ORDER NAME")]
    pub name: String,

    /// Card number
    #[arg(long, env = "DOUGH_CARD_NUMBER", hide_env_values = true, value_parser = parse_secret)]
    pub number: SecretString,

    /// Card expiration (MM/YY)
    #[arg(long, env = "DOUGH_CARD_EXPIRATION")]
    pub expiration: String,

    /// Card security code
    #[arg(long, env = "DOUGH_CARD_CODE", hide_env_values = true, value_parser = parse_secret)]
    pub code: SecretString,

    /// Actually place the order
    #[arg(short, long)]
    pub yes: bool,
}

impl std::fmt::Debug for CheckoutArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutArgs")
            .field("name", &self.name)
            .field("number", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .field("code", &"[REDACTED]")
            .field("yes", &self.yes)
            .finish()
    }
}

#[allow(clippy::unnecessary_wraps)]
fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::from(value.to_owned()))
}

/// Run `dough checkout`.
///
/// # Errors
///
/// Returns a user input error for an empty order or an unusable card, and
/// propagates lookup, pricing, submission and output failures.
pub async fn run<S, A>(
    args: CheckoutArgs,
    cart: &CartRepository<S>,
    api: &A,
    out: &mut impl Write,
) -> Result<(), CommandError>
where
    S: KeyValueStore,
    A: OrderingApi,
{
    validate_name(&args.name)?;
    let order = cart.load(&args.name)?;
    if order.is_empty() {
        return Err(CommandError::user_input(format!(
            "order {} has no products",
            args.name
        )));
    }

    let card = Payment::new(args.number, &args.expiration, args.code)
        .filter(|card| card.expires_on().is_valid())
        .ok_or_else(|| {
            CommandError::user_input(format!(
                "invalid card expiration {:?}, expected MM/YY",
                args.expiration
            ))
        })?;

    let price = order.price(api).await?;
    let payment = normalize(&card)
        .with_amount(&price)
        .with_postal_code(order.address.postal_code.clone());

    if !args.yes {
        let brand = &payment.card_type;
        writeln!(out, "{}", args.name)?;
        writeln!(out, "  total:      {}", price.display())?;
        if brand.is_empty() {
            writeln!(out, "  card:       {}", card.masked_num())?;
        } else {
            writeln!(out, "  card:       {} ({brand})", card.masked_num())?;
        }
        writeln!(out, "  expiration: {}", payment.expiration)?;
        writeln!(out, "run again with --yes to place this order.")?;
        return Ok(());
    }

    api.place(&order.into_submission(vec![payment])).await?;
    info!(order = %args.name, total = %price, "placed order");
    writeln!(out, "order placed.")?;
    Ok(())
}
