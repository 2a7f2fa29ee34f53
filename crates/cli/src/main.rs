//! Pricelist CLI - browse the catalog, manage the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! pl-cli products --search lavanda
//!
//! # Scent suggestions for a product
//! pl-cli suggest 12
//!
//! # Manage the cart
//! pl-cli cart add 12 --aroma Lavanda --quantity 2
//! pl-cli cart remove 12 --aroma Lavanda
//! pl-cli cart show
//! pl-cli cart clear
//!
//! # Print the WhatsApp order link
//! pl-cli cart order
//!
//! # Type search terms line by line and watch the filtered list
//! pl-cli browse
//! ```
//!
//! Every command accepts `--catalog FILE` to read a saved
//! `{ "productList": [...] }` payload instead of calling the API.
//!
//! Configuration is read from the environment (see
//! `pricelist_storefront::config`). Logs go to stderr; set `RUST_LOG` to
//! change verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricelist_storefront::config::StorefrontConfig;
use pricelist_storefront::error::Result;
use pricelist_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "pl-cli")]
#[command(author, version, about = "Pricelist storefront CLI")]
struct Cli {
    /// Read the catalog from a saved payload instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products matching this term
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Suggest scents for a product
    Suggest {
        /// Product identifier
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Interactive search: one term per stdin line, debounced
    Browse,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a product to the cart
    Add {
        /// Product identifier
        id: String,

        /// Scent label
        #[arg(short, long)]
        aroma: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product/scent line from the cart
    Remove {
        /// Product identifier
        id: String,

        /// Scent label
        #[arg(short, long)]
        aroma: String,
    },
    /// Empty the cart
    Clear,
    /// Print the order link
    Order {
        /// Print the plain message instead of the link
        #[arg(long)]
        text: bool,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pricelist_storefront=info,pricelist_cli=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;
    let catalog = cli.catalog.as_deref();

    match cli.command {
        Commands::Products { search } => {
            commands::products::list(&state, catalog, search.as_deref()).await?;
        }
        Commands::Suggest { id } => commands::products::suggest(&state, catalog, &id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add {
                id,
                aroma,
                quantity,
            } => commands::cart::add(&state, catalog, &id, &aroma, quantity).await?,
            CartAction::Remove { id, aroma } => commands::cart::remove(&state, &id, &aroma)?,
            CartAction::Clear => commands::cart::clear(&state)?,
            CartAction::Order { text } => commands::cart::order(&state, text),
        },
        Commands::Browse => commands::browse::run(&state, catalog).await?,
    }
    Ok(())
}
