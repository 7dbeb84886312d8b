//! Dough - order pizza from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Create an order with a medium MeatZZa
//! dough cart add dinner --products 12SCMEATZA
//!
//! # Add wings and check the total
//! dough cart dinner --add W08PBNLW,W08PPLNW
//! dough cart dinner --price
//!
//! # Place it
//! dough checkout dinner --number 4111111111111111 --expiration 12/25 --code 123 --yes
//! ```
//!
//! # Commands
//!
//! - `cart` - List, show, modify, create and delete saved orders
//! - `checkout` - Pay for and place a saved order
//!
//! Configuration comes from `DOUGH_*` environment variables; see
//! [`dough_cli::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use dough_cli::commands::cart::CartArgs;
use dough_cli::commands::checkout::CheckoutArgs;
use dough_cli::commands::{cart, checkout};
use dough_cli::{CliConfig, FileStore, HttpOrderingApi};
use dough_core::CartRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dough")]
#[command(author, version, about = "Order pizza from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user created orders
    ///
    /// Lists all saved orders. Use 'dough cart <order name>' for info on a
    /// specific order.
    Cart(CartArgs),
    /// Pay for and place a saved order
    Checkout(CheckoutArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Defaults to warnings only so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dough=warn,dough_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;
    let mut repo = CartRepository::new(FileStore::open(&config.data_file)?);
    let api = HttpOrderingApi::new(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Cart(args) => cart::run(args, &mut repo, &api, &mut out).await?,
        Commands::Checkout(args) => checkout::run(args, &repo, &api, &mut out).await?,
    }
    Ok(())
}
