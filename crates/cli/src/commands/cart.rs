//! Saved order management.
//!
//! # Usage
//!
//! ```bash
//! # List saved orders
//! dough cart
//!
//! # Show an order, with its price
//! dough cart dinner --price
//!
//! # Add products to an order
//! dough cart dinner --add W08PBNLW,W08PPLNW
//!
//! # Delete an order
//! dough cart dinner --delete
//!
//! # Create an order
//! dough cart add dinner --products 12SCMEATZA
//! ```

use std::io::Write;

use clap::{Args, Subcommand};
use dough_core::api::lookup_products;
use dough_core::cart::validate_name;
use dough_core::format::render;
use dough_core::{CartRepository, KeyValueStore, Order, OrderingApi};
use tracing::{info, warn};

use super::CommandError;

/// Arguments for `dough cart`.
#[derive(Debug, Default, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct CartArgs {
    #[command(subcommand)]
    pub action: Option<CartAction>,

    /// Order to show or modify
    #[arg(value_name = "ORDER NAME")]
    pub names: Vec<String>,

    /// Show the price of the order
    #[arg(short, long)]
    pub price: bool,

    /// Add products to the order (comma separated codes)
    #[arg(short, long, value_delimiter = ',', value_name = "CODES")]
    pub add: Vec<String>,

    /// Delete the order
    #[arg(short, long)]
    pub delete: bool,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Create a new order and store it in the cart
    Add(AddArgs),
}

/// Arguments for `dough cart add`.
#[derive(Debug, Default, Args)]
pub struct AddArgs {
    /// Name of the new order
    #[arg(value_name = "NEW ORDER NAME")]
    pub name: Option<String>,

    /// Name of the new order (takes precedence over the positional name)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name_flag: Option<String>,

    /// Product codes for the new order (comma separated)
    #[arg(short, long, value_delimiter = ',', value_name = "CODES")]
    pub products: Vec<String>,
}

/// Run `dough cart`.
///
/// # Errors
///
/// Returns an error for unusable arguments, missing orders, failed product
/// or price lookups, storage failures and output failures.
pub async fn run<S, A>(
    args: CartArgs,
    cart: &mut CartRepository<S>,
    api: &A,
    out: &mut impl Write,
) -> Result<(), CommandError>
where
    S: KeyValueStore,
    A: OrderingApi,
{
    if let Some(CartAction::Add(add)) = args.action {
        return create(add, cart, api).await;
    }

    let name = match args.names.as_slice() {
        [] => return list(cart, out),
        [name] => name.as_str(),
        _ => return Err(CommandError::user_input("cannot handle multiple orders")),
    };
    validate_name(name)?;

    if args.delete {
        return delete(name, cart, out);
    }
    if !args.add.is_empty() {
        return add_products(name, &args.add, cart, api, out).await;
    }
    show(name, args.price, cart, api, out).await
}

/// Print the names of all saved orders.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output fails.
pub fn list<S: KeyValueStore>(
    cart: &CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let names = cart.list_all()?;
    if names.is_empty() {
        writeln!(out, "No orders saved.")?;
        return Ok(());
    }

    writeln!(out, "Your Orders:")?;
    for name in names {
        writeln!(out, "  {name}")?;
    }
    Ok(())
}

/// Print one order, optionally with its price.
///
/// The price is fetched before anything is written, so a failed lookup
/// leaves `out` untouched.
///
/// # Errors
///
/// Returns an error if the order is missing or unreadable, the price lookup
/// fails, or output fails.
pub async fn show<S, A>(
    name: &str,
    with_price: bool,
    cart: &CartRepository<S>,
    api: &A,
    out: &mut impl Write,
) -> Result<(), CommandError>
where
    S: KeyValueStore,
    A: OrderingApi,
{
    let order = cart.load(name)?;
    let price = if with_price {
        Some(order.price(api).await?)
    } else {
        None
    };
    out.write_all(render(name, &order, price.as_ref()).as_bytes())?;
    Ok(())
}

/// Append products to a saved order.
///
/// Every code is looked up before the order is touched; one bad code
/// abandons the whole update.
///
/// # Errors
///
/// Returns an error if the order is missing, a lookup fails, saving fails
/// or output fails.
pub async fn add_products<S, A, C>(
    name: &str,
    codes: &[C],
    cart: &mut CartRepository<S>,
    api: &A,
    out: &mut impl Write,
) -> Result<(), CommandError>
where
    S: KeyValueStore,
    A: OrderingApi,
    C: AsRef<str>,
{
    let mut order = cart.load(name)?;
    for product in lookup_products(api, codes).await? {
        order.add_product(&product);
    }
    cart.save(name, &order)?;
    info!(order = name, added = codes.len(), "updated order");

    writeln!(out, "updated order successfully saved.")?;
    Ok(())
}

/// Delete a saved order.
///
/// # Errors
///
/// Returns an error if the order does not exist or output fails.
pub fn delete<S: KeyValueStore>(
    name: &str,
    cart: &mut CartRepository<S>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    cart.delete(name)?;
    writeln!(out, "{name} successfully deleted.")?;
    Ok(())
}

/// Create a new order, optionally with products, and save it. Prints nothing.
///
/// # Errors
///
/// Returns an error if no usable name is given, a lookup fails or saving
/// fails.
pub async fn create<S, A>(
    args: AddArgs,
    cart: &mut CartRepository<S>,
    api: &A,
) -> Result<(), CommandError>
where
    S: KeyValueStore,
    A: OrderingApi,
{
    let Some(name) = args.name_flag.or(args.name) else {
        return Err(CommandError::user_input(
            "no order name... use '--name=<order name>' or give name as an argument",
        ));
    };
    validate_name(&name)?;

    let mut order: Order = api.new_order();
    for product in lookup_products(api, &args.products).await? {
        order.add_product(&product);
    }

    if cart.exists(&name)? {
        warn!(order = %name, "replacing existing order");
    }
    cart.save(&name, &order)?;
    info!(order = %name, products = order.products.len(), "created order");
    Ok(())
}
