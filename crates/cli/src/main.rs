//! Shopfront CLI - browse the catalog, keep a cart and wishlist, check out.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shopfront products list --category electronics
//! shopfront products show 3
//! shopfront products featured
//!
//! # Cart and wishlist
//! shopfront cart add 3
//! shopfront cart set 3 2
//! shopfront wishlist add 5
//! shopfront wishlist move-to-cart 5
//!
//! # Session
//! shopfront auth signin -e demo@example.com -p password123
//!
//! # Checkout
//! shopfront checkout --full-name "Demo User" --address "1 Market St" \
//!     --city "San Francisco" --state CA --zip-code 94105 --country US \
//!     --phone 555-0100 --paypal
//! ```
//!
//! State persists under `SHOPFRONT_DATA_DIR` (default `.shopfront`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront::catalog::FakeStoreClient;
use shopfront::config::StorefrontConfig;
use shopfront::persistence::{FileStore, SharedStorage};
use shopfront::state::AppState;
use shopfront_core::ProductId;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shop from the command line")]
struct Cli {
    /// Directory holding cart, wishlist and session state (overrides SHOPFRONT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Emit logs as JSON lines instead of text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Place an order for the cart
    Checkout(commands::checkout::CheckoutArgs),
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Listing order
        #[arg(short, long, value_enum, default_value_t)]
        sort: commands::products::SortOrder,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Products per page
        #[arg(long, default_value_t = 8)]
        page_size: usize,
    },
    /// Show one product and related products
    Show { id: ProductId },
    /// Show the best-rated products
    Featured,
    /// List categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and subtotal
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
    /// Set the quantity of a product already in the cart (< 1 removes it)
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlisted products
    Show,
    /// Add a product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
    /// Empty the wishlist
    Clear,
    /// Add a wishlisted product to the cart
    MoveToCart { id: ProductId },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in (directory auth mode)
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Signout,
    /// Show the signed-in identity
    Whoami,
}

fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Route tracing events to Sentry: errors and warnings become events,
/// info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(2);
        }
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info,shopfront_cli=info".into());

    let json_layer = cli.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let code = match run(cli.command, config).await {
        Ok(()) => 0,
        Err(e) => {
            e.report();
            output::error(&e.user_message());
            1
        }
    };

    // Flush pending Sentry events before exiting
    drop(sentry_guard);
    std::process::exit(code);
}

async fn run(command: Commands, config: StorefrontConfig) -> shopfront::error::Result<()> {
    let storage: SharedStorage = Arc::new(FileStore::open(config.data_dir.clone())?);
    let catalog = FakeStoreClient::new(&config.catalog)?;
    let mut state = AppState::load(config, catalog, storage);

    match command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                sort,
                page,
                page_size,
            } => {
                let page = commands::products::Page {
                    number: page,
                    size: page_size,
                };
                commands::products::list(&state, category.as_deref(), sort, page).await?;
            }
            ProductsAction::Show { id } => commands::products::show(&state, id).await?,
            ProductsAction::Featured => commands::products::featured(&mut state).await?,
            ProductsAction::Categories => commands::products::categories(&state).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&mut state).await,
            CartAction::Add { id } => commands::cart::add(&mut state, id)?,
            CartAction::Remove { id } => commands::cart::remove(&mut state, id),
            CartAction::Set { id, quantity } => commands::cart::set(&mut state, id, quantity),
            CartAction::Clear => commands::cart::clear(&mut state),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&mut state).await,
            WishlistAction::Add { id } => commands::wishlist::add(&mut state, id)?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&mut state, id),
            WishlistAction::Clear => commands::wishlist::clear(&mut state),
            WishlistAction::MoveToCart { id } => {
                commands::wishlist::move_to_cart(&mut state, id)?;
            }
        },
        Commands::Auth { action } => match action {
            AuthAction::Signin { email, password } => {
                commands::auth::sign_in(&mut state, &email, password)?;
            }
            AuthAction::Signup {
                name,
                email,
                password,
            } => commands::auth::sign_up(&mut state, &name, &email, password)?,
            AuthAction::Signout => commands::auth::sign_out(&mut state),
            AuthAction::Whoami => commands::auth::whoami(&state),
        },
        Commands::Checkout(args) => commands::checkout::run(&mut state, args).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_featured_and_log_json_parse() {
        let cli = Cli::try_parse_from(["shopfront", "products", "featured", "--log-json"]).unwrap();
        assert!(cli.log_json);
        assert!(matches!(
            cli.command,
            Commands::Products {
                action: ProductsAction::Featured
            }
        ));
    }

    #[test]
    fn test_cart_set_accepts_negative_quantity() {
        let cli = Cli::try_parse_from(["shopfront", "cart", "set", "3", "-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Set { quantity: -1, .. }
            })
        ));
    }
}
