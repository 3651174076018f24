//! Money
//!
//! Parsing and display helpers for minor-unit amounts.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, IQD, USD},
};
use thiserror::Error;

/// Errors that can occur while parsing a price.
#[derive(Debug, Error, PartialEq)]
pub enum MoneyParseError {
    /// The input was not in the `AMOUNT CURRENCY` format.
    #[error("Expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// The amount could not be parsed or is not representable in minor units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not supported.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported currency by its ISO alpha code.
///
/// # Errors
///
/// Returns [`MoneyParseError::UnknownCurrency`] if the code is not supported.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, MoneyParseError> {
    match code {
        "IQD" => Ok(IQD),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(MoneyParseError::UnknownCurrency(other.to_string())),
    }
}

/// Convert a major-unit decimal amount into minor units of the given currency.
///
/// # Errors
///
/// Returns [`MoneyParseError::InvalidAmount`] if the amount has more fractional
/// digits than the currency allows, or does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal, currency: &Currency) -> Result<i64, MoneyParseError> {
    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(|| MoneyParseError::InvalidAmount(amount.to_string()))?;

    let scaled = amount
        .checked_mul(Decimal::from(scale))
        .ok_or_else(|| MoneyParseError::InvalidAmount(amount.to_string()))?;

    if !scaled.fract().is_zero() {
        return Err(MoneyParseError::InvalidAmount(amount.to_string()));
    }

    scaled
        .to_i64()
        .ok_or_else(|| MoneyParseError::InvalidAmount(amount.to_string()))
}

/// Parse a price string (e.g. `"3000 IQD"` or `"2.99 GBP"`) into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if the
/// amount cannot be parsed exactly, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), MoneyParseError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(MoneyParseError::InvalidFormat(s.to_string()));
    };

    let currency = currency_from_code(code)?;

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MoneyParseError::InvalidAmount(s.to_string()))?;

    Ok((to_minor_units(amount, currency)?, currency))
}

/// Format an amount as grouped major units followed by the currency code.
///
/// The fractional part is only shown when it is non-zero, so 300 dinars render
/// as `300 IQD` and `1250` minor units of GBP as `12.50 GBP`.
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    let currency = money.currency();
    let minor_units = money.to_minor_units();
    let scale = 10_u64.checked_pow(currency.exponent).unwrap_or(1);

    let abs_minor = minor_units.unsigned_abs();
    let major_units = abs_minor / scale;
    let fractional = abs_minor % scale;
    let sign = if minor_units < 0 { "-" } else { "" };
    let grouped = group_thousands(major_units);
    let code = currency.iso_alpha_code;

    if fractional == 0 {
        format!("{sign}{grouped} {code}")
    } else {
        let width = usize::try_from(currency.exponent).unwrap_or_default();

        format!("{sign}{grouped}.{fractional:0width$} {code}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(ch);
    }

    grouped
}
