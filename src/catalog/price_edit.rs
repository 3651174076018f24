//! Price Edits
//!
//! An edit is validated against the local product, sent to the catalog API as
//! a full price list, and only applied locally once the API has accepted it.
//! Carts are never re-priced; line items keep the price they were added at.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::catalog::products::{Product, SizePrice};

/// Errors that can occur while editing a product price.
#[derive(Debug, Error, PartialEq)]
pub enum PriceEditError {
    /// The new price is zero or negative.
    #[error("Price must be greater than zero, got {0}")]
    NotPositive(i64),

    /// The product has no price for the size.
    #[error("Product {0} has no price for size {1}")]
    UnknownSize(String, String),

    /// The new price is in a different currency to the product prices.
    #[error("Price has currency {0}, but product has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The edit was prepared for a different product.
    #[error("Price edit for {0} cannot be applied to {1}")]
    ProductMismatch(String, String),
}

/// A validated, not yet applied, price change.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceEdit<'a> {
    product_code: String,
    size: String,
    previous: Money<'a, Currency>,
    prices: Vec<SizePrice<'a>>,
}

impl<'a> PriceEdit<'a> {
    /// Code of the edited product.
    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    /// Edited size.
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Price before the edit.
    pub fn previous(&self) -> Money<'a, Currency> {
        self.previous
    }

    /// Full price list to send to the catalog API.
    pub fn prices(&self) -> &[SizePrice<'a>] {
        &self.prices
    }

    /// Commit the edit to the local product.
    ///
    /// # Errors
    ///
    /// Returns [`PriceEditError::ProductMismatch`] if the edit was prepared for
    /// another product.
    pub fn apply(self, product: &mut Product<'a>) -> Result<(), PriceEditError> {
        if product.code != self.product_code {
            return Err(PriceEditError::ProductMismatch(
                self.product_code,
                product.code.clone(),
            ));
        }

        product.prices = self.prices;

        Ok(())
    }
}

impl<'a> Product<'a> {
    /// Prepare a price change for one size.
    ///
    /// Returns `Ok(None)` when the price is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceEditError`] if the price is not positive, the size is
    /// unknown, or the currency differs from the existing price.
    pub fn edit_price(
        &self,
        size: &str,
        new_price: Money<'a, Currency>,
    ) -> Result<Option<PriceEdit<'a>>, PriceEditError> {
        let minor_units = new_price.to_minor_units();

        if minor_units <= 0 {
            return Err(PriceEditError::NotPositive(minor_units));
        }

        let previous = *self
            .price_for(size)
            .ok_or_else(|| PriceEditError::UnknownSize(self.code.clone(), size.to_string()))?;

        if previous.currency() != new_price.currency() {
            return Err(PriceEditError::CurrencyMismatch(
                new_price.currency().iso_alpha_code,
                previous.currency().iso_alpha_code,
            ));
        }

        if previous == new_price {
            return Ok(None);
        }

        let prices = self
            .prices
            .iter()
            .map(|price| {
                if price.size == size {
                    SizePrice::new(size, new_price)
                } else {
                    price.clone()
                }
            })
            .collect();

        Ok(Some(PriceEdit {
            product_code: self.code.clone(),
            size: size.to_string(),
            previous,
            prices,
        }))
    }
}
