//! Order Messages
//!
//! Renders a cart as the plain-text order message sent to the shop.

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::Cart,
    catalog::Language,
    money::format_amount,
    pricing::TotalPriceError,
};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━";

/// A customization as shown on the order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderCustomization<'a> {
    /// Display name
    pub name: String,

    /// Price per unit
    pub price: Money<'a, Currency>,
}

/// One numbered line of an order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderLine<'a> {
    /// 1-based position in the cart
    pub index: usize,

    /// Product display name
    pub name: String,

    /// Size label
    pub size: String,

    /// Quantity
    pub quantity: u32,

    /// Base price per unit
    pub unit_price: Money<'a, Currency>,

    /// Chosen customizations
    pub customizations: Vec<OrderCustomization<'a>>,

    /// Line total
    pub subtotal: Money<'a, Currency>,
}

/// Structured order the message text is rendered from.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSummary<'a> {
    /// Shop name in the header
    pub shop_name: String,

    /// Lines in cart order
    pub lines: Vec<OrderLine<'a>>,

    /// Cart total
    pub total: Money<'a, Currency>,
}

impl<'a> OrderSummary<'a> {
    /// Summarize a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line or cart total cannot be calculated.
    pub fn from_cart(
        cart: &Cart<'a>,
        shop_name: &str,
        language: Language,
    ) -> Result<Self, TotalPriceError> {
        let lines = cart
            .iter()
            .enumerate()
            .map(|(idx, item)| -> Result<_, TotalPriceError> {
                Ok(OrderLine {
                    index: idx + 1,
                    name: item.name().get(language).to_string(),
                    size: item.size().to_string(),
                    quantity: item.quantity(),
                    unit_price: *item.unit_price(),
                    customizations: item
                        .customizations()
                        .iter()
                        .map(|option| OrderCustomization {
                            name: option.name.get(language).to_string(),
                            price: option.price,
                        })
                        .collect(),
                    subtotal: item.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, TotalPriceError>>()?;

        Ok(Self {
            shop_name: shop_name.to_string(),
            lines,
            total: cart.total()?,
        })
    }
}

impl fmt::Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "🍵 *{} Order*\n\n", self.shop_name)?;

        for line in &self.lines {
            writeln!(f, "{}. *{}* ({})", line.index, line.name, line.size)?;
            writeln!(f, "   Quantity: {}", line.quantity)?;
            writeln!(f, "   Price: {}", format_amount(&line.unit_price))?;

            if !line.customizations.is_empty() {
                writeln!(f, "   Customizations:")?;

                for customization in &line.customizations {
                    writeln!(
                        f,
                        "   - {} (+{})",
                        customization.name,
                        format_amount(&customization.price)
                    )?;
                }
            }

            write!(f, "   *Subtotal: {}*\n\n", format_amount(&line.subtotal))?;
        }

        writeln!(f, "{SEPARATOR}")?;
        write!(f, "*Total: {}*\n\nThank you! 🙏", format_amount(&self.total))
    }
}

/// Formats carts as order messages for one shop.
#[derive(Clone, Debug)]
pub struct OrderFormatter {
    shop_name: String,
    language: Language,
}

impl OrderFormatter {
    /// Create a formatter for the named shop.
    pub fn new(shop_name: impl Into<String>) -> Self {
        Self {
            shop_name: shop_name.into(),
            language: Language::default(),
        }
    }

    /// Render names in the given language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Shop name shown in the message header.
    pub fn shop_name(&self) -> &str {
        &self.shop_name
    }

    /// Build the structured summary for a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line or cart total cannot be calculated.
    pub fn summarize<'a>(&self, cart: &Cart<'a>) -> Result<OrderSummary<'a>, TotalPriceError> {
        OrderSummary::from_cart(cart, &self.shop_name, self.language)
    }

    /// Render the order message for a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line or cart total cannot be calculated.
    pub fn format(&self, cart: &Cart<'_>) -> Result<String, TotalPriceError> {
        Ok(self.summarize(cart)?.to_string())
    }
}
