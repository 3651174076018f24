//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::{CartLineItem, LineItemCandidate, LineItemId},
    pricing::{TotalPriceError, total_price},
};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line item's currency differs from the cart currency (line, item currency, cart currency).
    #[error("Line item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineItemId, &'static str, &'static str),

    /// A quantity does not fit the line item quantity range.
    #[error("Quantity {1} is out of range for line item {0}")]
    QuantityOutOfRange(LineItemId, i64),
}

/// Observable cart state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartState {
    /// No line items.
    Empty,

    /// At least one line item.
    NonEmpty,
}

/// Cart
///
/// An insertion-ordered collection of line items, keyed by line item id.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<CartLineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add one unit of a configured product.
    ///
    /// If a line with the same id exists its quantity is incremented, otherwise
    /// a new line with quantity one is appended.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the candidate is priced in another currency,
    /// or the existing line's quantity would overflow.
    pub fn add_item(&mut self, candidate: LineItemCandidate<'a>) -> Result<LineItemId, CartError> {
        let candidate_currency = candidate.unit_price().currency();

        if candidate_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                candidate.id().clone(),
                candidate_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.id() == candidate.id()) {
            let quantity = existing.quantity().checked_add(1).ok_or_else(|| {
                CartError::QuantityOutOfRange(
                    existing.id().clone(),
                    i64::from(existing.quantity()) + 1,
                )
            })?;

            existing.set_quantity(quantity);

            debug!(line = %existing.id(), quantity, "incremented cart line");

            return Ok(existing.id().clone());
        }

        let item = CartLineItem::new(candidate);
        let id = item.id().clone();

        debug!(line = %id, "added cart line");

        self.items.push(item);

        Ok(id)
    }

    /// Remove a line item. Unknown ids are ignored.
    ///
    /// Returns the removed line, if there was one.
    pub fn remove_item(&mut self, id: &LineItemId) -> Option<CartLineItem<'a>> {
        let position = self.items.iter().position(|item| item.id() == id)?;

        debug!(line = %id, "removed cart line");

        Some(self.items.remove(position))
    }

    /// Set the quantity of a line item in place.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOutOfRange`] if the quantity is too large.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_item(id);

            return Ok(());
        }

        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return Ok(());
        };

        let quantity = u32::try_from(quantity)
            .map_err(|_err| CartError::QuantityOutOfRange(id.clone(), quantity))?;

        item.set_quantity(quantity);

        Ok(())
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Calculate the cart total; zero for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if there was a money arithmetic or overflow error.
    pub fn total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        total_price(&self.items)
    }

    /// Sum of quantities over all lines; zero for an empty cart.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Get a line item by id.
    pub fn get(&self, id: &LineItemId) -> Option<&CartLineItem<'a>> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem<'a>> {
        self.items.iter()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem<'a>] {
        &self.items
    }

    /// Get the number of line items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current cart state.
    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
