//! Checkout
//!
//! Hands the formatted order message to a dispatcher and empties the cart once
//! the dispatcher has accepted it.

use std::fmt::{self, Write};

use mockall::automock;
use thiserror::Error;
use tracing::{info, warn};

use crate::{cart::Cart, order::OrderFormatter, pricing::TotalPriceError};

/// Base URL for chat deep links.
pub const DEFAULT_DEEP_LINK_BASE: &str = "https://wa.me";

/// Errors raised by a checkout dispatcher.
#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    /// The destination is not a phone number.
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// The message could not be handed over.
    #[error("Dispatch rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur during checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The order total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] TotalPriceError),

    /// The dispatcher failed; the cart is left untouched.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Delivers an order message to the shop.
#[automock]
pub trait CheckoutDispatcher {
    /// Send the payload to the destination.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the message could not be handed over.
    fn dispatch(&self, destination: &str, payload: &str) -> Result<(), DispatchError>;
}

/// Dispatcher that builds a chat deep link and hands it to an opener.
pub struct DeepLinkDispatcher<F> {
    base_url: String,
    opener: F,
}

impl<F> DeepLinkDispatcher<F>
where
    F: Fn(&str) -> Result<(), DispatchError>,
{
    /// Create a dispatcher for the default deep link base.
    pub fn new(opener: F) -> Self {
        Self::with_base_url(DEFAULT_DEEP_LINK_BASE, opener)
    }

    /// Create a dispatcher for a custom deep link base.
    pub fn with_base_url(base_url: impl Into<String>, opener: F) -> Self {
        Self {
            base_url: base_url.into(),
            opener,
        }
    }

    /// Build the deep link for a destination and message.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidDestination`] unless the destination is
    /// a phone number (digits with an optional leading `+`).
    pub fn deep_link(&self, destination: &str, payload: &str) -> Result<String, DispatchError> {
        let number = destination.strip_prefix('+').unwrap_or(destination);

        if number.is_empty() || !number.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(DispatchError::InvalidDestination(destination.to_string()));
        }

        Ok(format!(
            "{}/{number}?text={}",
            self.base_url.trim_end_matches('/'),
            percent_encode(payload)
        ))
    }
}

impl<F> CheckoutDispatcher for DeepLinkDispatcher<F>
where
    F: Fn(&str) -> Result<(), DispatchError>,
{
    fn dispatch(&self, destination: &str, payload: &str) -> Result<(), DispatchError> {
        let link = self.deep_link(destination, payload)?;

        (self.opener)(&link)
    }
}

impl<F> fmt::Debug for DeepLinkDispatcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepLinkDispatcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Percent-encode text for a URL query component.
///
/// Leaves ASCII alphanumerics and `-_.!~*'()` as they are and encodes every
/// other UTF-8 byte as `%XX`.
pub fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len() * 3);

    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            _ = write!(encoded, "%{byte:02X}");
        }
    }

    encoded
}

/// Format the cart as an order message and dispatch it.
///
/// The cart is cleared only after the dispatcher accepts the message. Returns
/// the dispatched message.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: The cart has no line items.
/// - [`CheckoutError::Pricing`]: The order total could not be calculated.
/// - [`CheckoutError::Dispatch`]: The dispatcher failed; the cart is unchanged.
pub fn checkout<D>(
    cart: &mut Cart<'_>,
    formatter: &OrderFormatter,
    dispatcher: &D,
    destination: &str,
) -> Result<String, CheckoutError>
where
    D: CheckoutDispatcher + ?Sized,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let message = formatter.format(cart)?;

    if let Err(err) = dispatcher.dispatch(destination, &message) {
        warn!(%destination, error = %err, "order dispatch failed");

        return Err(err.into());
    }

    info!(
        %destination,
        lines = cart.len(),
        items = cart.item_count(),
        "order dispatched"
    );

    cart.clear();

    Ok(message)
}
