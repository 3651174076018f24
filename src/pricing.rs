//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::CartLineItem;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// A line total does not fit in minor units.
    #[error("line total overflows for {0}")]
    Overflow(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price of a single unit of a line item: base price plus customizations.
///
/// # Errors
///
/// Returns a [`TotalPriceError::Money`] on money arithmetic or currency mismatch errors.
pub fn unit_total<'a>(item: &CartLineItem<'a>) -> Result<Money<'a, Currency>, TotalPriceError> {
    let total = item
        .customizations()
        .iter()
        .try_fold(*item.unit_price(), |acc, option| acc.add(option.price))?;

    Ok(total)
}

/// Total for a line item: `(unit price + customizations) * quantity`.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: The total does not fit in minor units.
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn line_total<'a>(item: &CartLineItem<'a>) -> Result<Money<'a, Currency>, TotalPriceError> {
    let unit = unit_total(item)?;

    let minor_units = unit
        .to_minor_units()
        .checked_mul(i64::from(item.quantity()))
        .ok_or_else(|| TotalPriceError::Overflow(item.id().to_string()))?;

    Ok(Money::from_minor(minor_units, unit.currency()))
}

/// Calculates the total price of a list of line items
///
/// # Errors
///
/// - [`TotalPriceError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`TotalPriceError::Overflow`]: A line total does not fit in minor units.
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a>(
    items: &[CartLineItem<'a>],
) -> Result<Money<'a, Currency>, TotalPriceError> {
    let first = items.first().ok_or(TotalPriceError::NoItems)?;

    items.iter().try_fold(
        Money::from_minor(0, first.unit_price().currency()),
        |acc, item| -> Result<_, TotalPriceError> { Ok(acc.add(line_total(item)?)?) },
    )
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{
        catalog::{CustomizationOption, Customizations, LocalizedName},
        items::{LineItemCandidate, LineItemError},
    };

    use super::*;

    fn item<'a>(
        product: &str,
        unit: Money<'a, Currency>,
        extras: &[i64],
    ) -> Result<CartLineItem<'a>, LineItemError> {
        let customizations: Customizations<'a> = extras
            .iter()
            .enumerate()
            .map(|(idx, minor_units)| {
                CustomizationOption::new(
                    format!("extra_{idx}"),
                    LocalizedName::default(),
                    Money::from_minor(*minor_units, unit.currency()),
                )
            })
            .collect();

        let candidate = LineItemCandidate::compose(
            product,
            LocalizedName::default(),
            "medium",
            unit,
            customizations,
            None,
        )?;

        Ok(CartLineItem::new(candidate))
    }

    #[test]
    fn test_total_price() -> TestResult {
        let items = [
            item("P1", Money::from_minor(3000, GBP), &[500])?,
            item("P2", Money::from_minor(2000, GBP), &[])?,
        ];

        assert_eq!(total_price(&items)?, Money::from_minor(5500, GBP));

        Ok(())
    }

    #[test]
    fn test_total_price_empty() {
        let items: [CartLineItem<'static>; 0] = [];

        assert!(matches!(total_price(&items), Err(TotalPriceError::NoItems)));
    }

    #[test]
    fn test_total_price_currency_mismatch() -> TestResult {
        let items = [
            item("P1", Money::from_minor(100, GBP), &[])?,
            item("P2", Money::from_minor(100, USD), &[])?,
        ];

        assert_eq!(
            total_price(&items),
            Err(TotalPriceError::Money(MoneyError::CurrencyMismatch {
                expected: GBP.iso_alpha_code,
                actual: USD.iso_alpha_code,
            }))
        );

        Ok(())
    }

    #[test]
    fn unit_total_adds_every_customization() -> TestResult {
        let line = item("P1", Money::from_minor(3000, GBP), &[500, 250, 100])?;

        assert_eq!(unit_total(&line)?, Money::from_minor(3850, GBP));

        Ok(())
    }

    #[test]
    fn line_total_multiplies_by_quantity() -> TestResult {
        let mut line = item("P1", Money::from_minor(3000, GBP), &[500])?;

        line.set_quantity(3);

        assert_eq!(line_total(&line)?, Money::from_minor(10_500, GBP));

        Ok(())
    }

    #[test]
    fn line_total_never_below_base_price_times_quantity() -> TestResult {
        for extras in [&[][..], &[0][..], &[1, 2, 3][..]] {
            let mut line = item("P1", Money::from_minor(1999, GBP), extras)?;

            line.set_quantity(4);

            assert!(
                line_total(&line)?.to_minor_units() >= 1999 * 4,
                "line total dropped below base price for extras {extras:?}"
            );
        }

        Ok(())
    }

    #[test]
    fn line_total_overflow_is_an_error() -> TestResult {
        let mut line = item("P1", Money::from_minor(i64::MAX / 2, GBP), &[])?;

        line.set_quantity(3);

        assert!(matches!(line_total(&line), Err(TotalPriceError::Overflow(_))));

        Ok(())
    }
}
