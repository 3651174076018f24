//! Coffee Cart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartState},
    catalog::{
        Catalog, CatalogError, CatalogProvider, CustomizationOption, Customizations, Language,
        LocalizedName, PriceEdit, PriceEditError, Product, ProductKey, SizePrice,
    },
    checkout::{
        CheckoutDispatcher, CheckoutError, DeepLinkDispatcher, DispatchError, checkout,
    },
    fixtures::{Fixture, FixtureError},
    items::{CartLineItem, LineItemCandidate, LineItemError, LineItemId},
    menu::{MenuFilter, MenuQuery, filter_menu},
    money::{MoneyParseError, format_amount, parse_price},
    order::{OrderFormatter, OrderLine, OrderSummary},
    pricing::TotalPriceError,
    receipt::{Receipt, ReceiptError},
};
