//! Catalog Fixtures

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    catalog::{Catalog, CustomizationOption, LocalizedName, Product, SizePrice},
    fixtures::FixtureError,
    money::{currency_from_code, parse_price},
};

/// Catalog fixture file
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Currency code every price must use (e.g. `IQD`)
    pub currency: String,

    /// Customization options in display order
    #[serde(default)]
    pub customizations: Vec<CustomizationFixture>,

    /// Products in menu order
    pub products: Vec<ProductFixture>,
}

/// Customization Option Fixture
#[derive(Debug, Deserialize)]
pub struct CustomizationFixture {
    /// Option id
    pub id: String,

    /// English name
    pub name_en: String,

    /// Arabic name
    pub name_ar: String,

    /// Price (e.g., "500 IQD")
    pub price: String,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product code
    pub code: String,

    /// English name
    pub name_en: String,

    /// Arabic name
    pub name_ar: String,

    /// Menu category
    pub category: String,

    /// Tags (e.g. `Hot`, `Cold`)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Caffeine index, 0 for caffeine-free
    #[serde(default)]
    pub caffeine_index: u8,

    /// Whether customizations can be attached
    #[serde(default)]
    pub customizable: bool,

    /// Prices in display order
    pub prices: Vec<PriceFixture>,

    /// Flavour notes
    #[serde(default)]
    pub flavors: Vec<String>,

    /// Linked customization option ids
    #[serde(default)]
    pub customization_options: Vec<String>,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Size Price Fixture
#[derive(Debug, Deserialize)]
pub struct PriceFixture {
    /// Size label
    pub size: String,

    /// Price (e.g., "3000 IQD")
    pub price: String,
}

impl CatalogFixture {
    /// Build a catalog, checking every price against the fixture currency.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if a price cannot be parsed, uses another
    /// currency, or the catalog rejects an entry.
    pub fn into_catalog<'a>(self) -> Result<Catalog<'a>, FixtureError> {
        let currency = currency_from_code(&self.currency)?;
        let mut catalog = Catalog::new(currency);

        for option in self.customizations {
            let price = fixture_price(&option.price, currency)?;

            catalog.insert_option(CustomizationOption::new(
                option.id,
                LocalizedName::new(option.name_en, option.name_ar),
                price,
            ))?;
        }

        for fixture in self.products {
            let product = fixture.into_product(currency)?;

            catalog.insert_product(product)?;
        }

        Ok(catalog)
    }
}

impl ProductFixture {
    fn into_product<'a>(self, currency: &'static Currency) -> Result<Product<'a>, FixtureError> {
        let prices = self
            .prices
            .iter()
            .map(|price| -> Result<_, FixtureError> {
                Ok(SizePrice::new(
                    price.size.to_lowercase(),
                    fixture_price(&price.price, currency)?,
                ))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let mut product = Product::new(
            self.code,
            LocalizedName::new(self.name_en, self.name_ar),
            self.category,
        );

        product.tags = self.tags;
        product.caffeine_index = self.caffeine_index;
        product.customizable = self.customizable;
        product.prices = prices;
        product.flavors = self.flavors;
        product.customization_option_ids = self.customization_options;
        product.image = self.image;

        Ok(product)
    }
}

fn fixture_price<'a>(
    price: &str,
    expected: &'static Currency,
) -> Result<Money<'a, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(price)?;

    if currency != expected {
        return Err(FixtureError::CurrencyMismatch(
            expected.iso_alpha_code.to_string(),
            currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(Money::from_minor(minor_units, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::catalog::CatalogProvider;

    use super::*;

    #[test]
    fn builds_catalog_in_file_order() -> TestResult {
        let fixture: CatalogFixture = serde_norway::from_str(
            r"
currency: GBP
customizations:
  - id: oat_milk
    name_en: Oat Milk
    name_ar: حليب الشوفان
    price: 0.45 GBP
products:
  - code: flat_white
    name_en: Flat White
    name_ar: فلات وايت
    category: Coffee
    tags: [Hot]
    caffeine_index: 3
    customizable: true
    prices:
      - size: Small
        price: 2.80 GBP
      - size: Large
        price: 3.40 GBP
    customization_options: [oat_milk]
  - code: mint_tea
    name_en: Mint Tea
    name_ar: شاي بالنعناع
    category: Tea
    prices:
      - size: regular
        price: 2.20 GBP
",
        )?;

        let catalog = fixture.into_catalog()?;

        assert_eq!(catalog.currency(), GBP);
        assert_eq!(catalog.categories(), ["Coffee", "Tea"]);

        let flat_white = catalog.product("flat_white").ok_or("missing flat white")?;

        assert_eq!(flat_white.price_for("large"), Some(&Money::from_minor(340, GBP)));
        assert_eq!(flat_white.customization_option_ids, ["oat_milk"]);
        assert!(catalog.product("mint_tea").is_some_and(Product::is_caffeine_free));

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() -> TestResult {
        let fixture: CatalogFixture = serde_norway::from_str(
            r"
currency: GBP
products:
  - code: latte
    name_en: Latte
    name_ar: لاتيه
    category: Coffee
    prices:
      - size: small
        price: 3.00 USD
",
        )?;

        assert!(matches!(
            fixture.into_catalog(),
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
        ));

        Ok(())
    }
}
