//! Items
//!
//! Cart line items: one configured product (product, size and chosen
//! customizations) with a quantity.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{
        CatalogProvider, CustomizationOption, Customizations, LocalizedName,
        resolve_customizations,
    },
    pricing::{TotalPriceError, line_total, unit_total},
};

/// Errors that can occur while composing a line item.
#[derive(Debug, Error, PartialEq)]
pub enum LineItemError {
    /// A price is below zero (priced entry, minor units).
    #[error("{0} has negative price {1}")]
    NegativePrice(String, i64),

    /// A customization is priced in a different currency to the product (option, option currency, product currency).
    #[error("Customization {0} has currency {1}, but product has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// The product is not in the catalog.
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// The product has no price for the size.
    #[error("Product {0} has no price for size {1}")]
    UnknownSize(String, String),
}

/// Line item identity.
///
/// Derived from the product id, size and the sorted customization ids, so two
/// identical configurations always share an id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemId(String);

impl LineItemId {
    /// Derive the id for a product configuration.
    ///
    /// Customization order and repeats do not affect the id.
    pub fn new<'s, I>(product_id: &str, size: &str, customization_ids: I) -> Self
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut ids: Vec<&str> = customization_ids.into_iter().collect();

        ids.sort_unstable();
        ids.dedup();

        let mut key = format!("{product_id}-{size}-[");

        for (idx, id) in ids.iter().enumerate() {
            if idx > 0 {
                key.push(',');
            }

            key.push('"');

            for ch in id.chars() {
                if matches!(ch, '"' | '\\') {
                    key.push('\\');
                }

                key.push(ch);
            }

            key.push('"');
        }

        key.push(']');

        Self(key)
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured product ready to be added to a cart.
///
/// Names and prices are snapshots taken at composition time; the cart never
/// goes back to the catalog for them.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItemCandidate<'a> {
    id: LineItemId,
    product_id: String,
    name: LocalizedName,
    size: String,
    unit_price: Money<'a, Currency>,
    customizations: Customizations<'a>,
    image: Option<String>,
}

impl<'a> LineItemCandidate<'a> {
    /// Compose a candidate from a product configuration.
    ///
    /// Repeated customizations are kept once, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the unit price or any customization
    /// price is negative, or a customization is priced in another currency.
    pub fn compose(
        product_id: impl Into<String>,
        name: LocalizedName,
        size: impl Into<String>,
        unit_price: Money<'a, Currency>,
        customizations: impl IntoIterator<Item = CustomizationOption<'a>>,
        image: Option<String>,
    ) -> Result<Self, LineItemError> {
        let product_id = product_id.into();
        let size = size.into();

        if unit_price.to_minor_units() < 0 {
            return Err(LineItemError::NegativePrice(
                product_id,
                unit_price.to_minor_units(),
            ));
        }

        let mut chosen = Customizations::new();

        for option in customizations {
            if chosen.iter().any(|existing: &CustomizationOption<'a>| existing.id == option.id) {
                continue;
            }

            if option.price.to_minor_units() < 0 {
                return Err(LineItemError::NegativePrice(
                    option.id,
                    option.price.to_minor_units(),
                ));
            }

            if option.price.currency() != unit_price.currency() {
                return Err(LineItemError::CurrencyMismatch(
                    option.id,
                    option.price.currency().iso_alpha_code,
                    unit_price.currency().iso_alpha_code,
                ));
            }

            chosen.push(option);
        }

        let id = LineItemId::new(
            &product_id,
            &size,
            chosen.iter().map(|option| option.id.as_str()),
        );

        Ok(Self {
            id,
            product_id,
            name,
            size,
            unit_price,
            customizations: chosen,
            image,
        })
    }

    /// Compose a candidate from catalog data.
    ///
    /// The base price comes from the product's price for the size; customization
    /// ids are resolved against the options offered for the product, and unknown
    /// ids are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the product or size is unknown, or if the
    /// catalog data fails the checks in [`LineItemCandidate::compose`].
    pub fn from_catalog<P, I, S>(
        catalog: &P,
        product_code: &str,
        size: &str,
        customization_ids: I,
    ) -> Result<Self, LineItemError>
    where
        P: CatalogProvider<'a> + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let product = catalog
            .product(product_code)
            .ok_or_else(|| LineItemError::UnknownProduct(product_code.to_string()))?;

        let unit_price = *product.price_for(size).ok_or_else(|| {
            LineItemError::UnknownSize(product_code.to_string(), size.to_string())
        })?;

        let offered = product.customization_options(catalog.customization_options());
        let chosen = resolve_customizations(customization_ids, &offered);

        Self::compose(
            product.code.clone(),
            product.name.clone(),
            size,
            unit_price,
            chosen,
            product.image.clone(),
        )
    }

    /// The id the candidate will have in a cart.
    pub fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Base price snapshot.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }
}

/// One row in the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct CartLineItem<'a> {
    id: LineItemId,
    product_id: String,
    name: LocalizedName,
    size: String,
    unit_price: Money<'a, Currency>,
    customizations: Customizations<'a>,
    quantity: u32,
    image: Option<String>,
}

impl<'a> CartLineItem<'a> {
    /// Creates a line item with a quantity of one.
    pub fn new(candidate: LineItemCandidate<'a>) -> Self {
        Self {
            id: candidate.id,
            product_id: candidate.product_id,
            name: candidate.name,
            size: candidate.size,
            unit_price: candidate.unit_price,
            customizations: candidate.customizations,
            quantity: 1,
            image: candidate.image,
        }
    }

    /// Returns the line id
    pub fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Returns the product id
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Returns the product name captured when the item was added
    pub fn name(&self) -> &LocalizedName {
        &self.name
    }

    /// Returns the size label
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Returns the base price captured when the item was added
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the chosen customizations
    pub fn customizations(&self) -> &[CustomizationOption<'a>] {
        &self.customizations
    }

    /// Returns the quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the image reference
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Price of a single unit including customizations.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] on money arithmetic errors.
    pub fn unit_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        unit_total(self)
    }

    /// Total for the line: unit price plus customizations, times quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] on money arithmetic errors or overflow.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        line_total(self)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        debug_assert!(quantity > 0, "line item quantity must be at least one");

        self.quantity = quantity;
    }
}
