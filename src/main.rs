//! Coffee Cart CLI
//!
//! Browse a catalog fixture, build a cart from `--add` arguments, and print the
//! receipt and order message. With a checkout number set, the order is handed
//! to a chat deep link and the link is printed.

use std::io::{self, Write};

use anyhow::{Context, Result};
use coffee_cart::{
    cart::Cart,
    catalog::{Catalog, CatalogProvider},
    checkout::{DeepLinkDispatcher, DispatchError, checkout},
    fixtures::Fixture,
    items::LineItemCandidate,
    menu::{MenuQuery, filter_menu},
    money::{format_amount, parse_price},
    order::OrderFormatter,
    receipt::Receipt,
};
use rusty_money::Money;
use tracing::info;

use crate::config::{CartConfig, CatalogConfig, Command, MenuArgs, OrderArgs, PriceArgs};

mod config;
mod logging;

/// Coffee Cart CLI entry point
pub fn main() -> Result<()> {
    let config = CartConfig::load().unwrap_or_else(|err| err.exit());

    logging::init_subscriber(&config.logging)?;

    let mut catalog = load_catalog(&config.catalog)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match config.command {
        Command::Menu(args) => print_menu(&mut handle, &catalog, &args),
        Command::Order(args) => place_order(&mut handle, &catalog, &args),
        Command::Price(args) => edit_price(&mut handle, &mut catalog, &args),
    }
}

fn load_catalog<'a>(config: &CatalogConfig) -> Result<Catalog<'a>> {
    let mut fixture = Fixture::with_base_path(&config.fixtures_dir);

    fixture
        .load_catalog(&config.fixture)
        .with_context(|| format!("failed to load catalog fixture {}", config.fixture))?;

    Ok(fixture.into_catalog()?)
}

fn print_menu(out: &mut impl Write, catalog: &Catalog<'_>, args: &MenuArgs) -> Result<()> {
    let query = MenuQuery::new()
        .search(args.search.as_str())
        .filter(args.filter)
        .category(args.category.clone());

    let options = catalog.customization_options();

    for category in catalog.categories() {
        let mut products = filter_menu(catalog, &query)
            .filter(|product| product.category == category)
            .peekable();

        if products.peek().is_none() {
            continue;
        }

        writeln!(out, "\n{category}")?;

        for product in products {
            let sizes = product
                .available_sizes()
                .filter_map(|size| {
                    product
                        .price_for(size)
                        .map(|price| format!("{size} {}", format_amount(price)))
                })
                .collect::<Vec<_>>()
                .join(", ");

            writeln!(
                out,
                "  {:<6} {}  [{sizes}]",
                product.code,
                product.name.get(args.language)
            )?;

            if product.customizable {
                let extras = product
                    .customization_options(options)
                    .iter()
                    .map(|option| {
                        format!(
                            "{} {} (+{})",
                            option.id,
                            option.name.get(args.language),
                            format_amount(&option.price)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");

                writeln!(out, "         extras: {extras}")?;
            }
        }
    }

    Ok(())
}

fn place_order(out: &mut impl Write, catalog: &Catalog<'_>, args: &OrderArgs) -> Result<()> {
    let mut cart = Cart::new(catalog.currency());

    for item in &args.items {
        let candidate = LineItemCandidate::from_catalog(
            catalog,
            &item.product,
            &item.size,
            &item.customizations,
        )?;

        cart.add_item(candidate)?;
    }

    Receipt::from_cart(&cart)?
        .with_language(args.language)
        .write_to(&mut *out, &cart)?;

    let formatter = OrderFormatter::new(args.shop_name.as_str()).with_language(args.language);

    let Some(number) = args.checkout_number.as_deref() else {
        writeln!(out, "{}", formatter.format(&cart)?)?;

        return Ok(());
    };

    let dispatcher = DeepLinkDispatcher::new(|link: &str| {
        let mut stdout = io::stdout().lock();

        writeln!(stdout, "{link}").map_err(|err| DispatchError::Rejected(err.to_string()))
    });

    let message = checkout(&mut cart, &formatter, &dispatcher, number)?;

    writeln!(out, "{message}")?;

    Ok(())
}

fn edit_price(out: &mut impl Write, catalog: &mut Catalog<'_>, args: &PriceArgs) -> Result<()> {
    let (minor_units, currency) = parse_price(&args.price)?;
    let size = args.size.to_lowercase();

    let product = catalog
        .product_mut(&args.product)
        .with_context(|| format!("unknown product {}", args.product))?;

    let Some(edit) = product.edit_price(&size, Money::from_minor(minor_units, currency))? else {
        writeln!(out, "{} {size} is already {}", product.code, args.price)?;

        return Ok(());
    };

    info!(
        product = edit.product_code(),
        size = edit.size(),
        previous = %format_amount(&edit.previous()),
        "prepared price edit"
    );

    writeln!(out, "Price list for {}:", edit.product_code())?;

    for price in edit.prices() {
        writeln!(out, "  {:<20} {}", price.size, format_amount(&price.price))?;
    }

    edit.apply(product)?;

    Ok(())
}
