//! CLI configuration

use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand};
use coffee_cart::{catalog::Language, menu::MenuFilter};
use thiserror::Error;

/// Coffee Cart configuration
#[derive(Debug, Parser)]
#[command(name = "coffee-cart", about = "Coffee shop cart and order builder", long_about = None)]
pub(crate) struct CartConfig {
    /// Catalog fixture settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl CartConfig {
    /// Load configuration from environment and CLI arguments
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Catalog fixture settings.
#[derive(Debug, Args)]
pub(crate) struct CatalogConfig {
    /// Catalog fixture name
    #[arg(short, long, env = "CART_FIXTURE", default_value = "dr-coffee")]
    pub fixture: String,

    /// Directory holding the `catalog/` fixtures
    #[arg(long, env = "CART_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the menu
    Menu(MenuArgs),

    /// Build a cart and print the receipt and order message
    Order(OrderArgs),

    /// Change a product price and show the price list to submit
    Price(PriceArgs),
}

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Search names and product codes
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Quick filter
    #[arg(long, value_enum, default_value_t = MenuFilter::All)]
    pub filter: MenuFilter,

    /// Only show one category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Display language
    #[arg(long, value_enum, default_value_t = Language::English)]
    pub language: Language,
}

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    /// Item to add, as `PRODUCT:SIZE[:OPTION,OPTION...]`; repeat to add more
    #[arg(short, long = "add", required = true)]
    pub items: Vec<ItemSpec>,

    /// Shop name in the order message header
    #[arg(long, env = "SHOP_NAME", default_value = "Dr.Coffee")]
    pub shop_name: String,

    /// Phone number to send the order to; prints the deep link when set
    #[arg(long, env = "CHECKOUT_NUMBER")]
    pub checkout_number: Option<String>,

    /// Display language
    #[arg(long, value_enum, default_value_t = Language::English)]
    pub language: Language,
}

#[derive(Debug, Args)]
pub(crate) struct PriceArgs {
    /// Product code
    pub product: String,

    /// Size label
    pub size: String,

    /// New price (e.g. "3500 IQD")
    pub price: String,
}

/// Errors parsing an item argument.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ItemSpecError {
    /// Product or size is missing.
    #[error("Expected PRODUCT:SIZE[:OPTION,OPTION...], got: {0}")]
    InvalidFormat(String),
}

/// One `--add` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ItemSpec {
    pub product: String,
    pub size: String,
    pub customizations: Vec<String>,
}

impl FromStr for ItemSpec {
    type Err = ItemSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':').map(str::trim);

        let (Some(product), Some(size)) = (parts.next(), parts.next()) else {
            return Err(ItemSpecError::InvalidFormat(s.to_string()));
        };

        if product.is_empty() || size.is_empty() {
            return Err(ItemSpecError::InvalidFormat(s.to_string()));
        }

        let customizations = parts.next().map_or_else(Vec::new, |options| {
            options
                .split(',')
                .map(str::trim)
                .filter(|option| !option.is_empty())
                .map(ToString::to_string)
                .collect()
        });

        Ok(Self {
            product: product.to_string(),
            size: size.to_lowercase(),
            customizations,
        })
    }
}
