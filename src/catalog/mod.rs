//! Catalog
//!
//! Reference data the cart prices from: products with per-size prices and the
//! customization options that can be attached to them.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::money::MoneyParseError;

pub mod options;
pub mod price_edit;
pub mod products;

pub use options::{
    CustomizationOption, CustomizationOptionRecord, Customizations, Language, LocalizedName,
    resolve_customizations,
};
pub use price_edit::{PriceEdit, PriceEditError};
pub use products::{Product, ProductKey, ProductPriceRecord, ProductRecord, SizePrice};

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A price has a different currency to the catalog (entry, price currency, catalog currency).
    #[error("{0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A product with the same code already exists.
    #[error("Duplicate product code: {0}")]
    DuplicateProduct(String),

    /// A customization option with the same id already exists.
    #[error("Duplicate customization option: {0}")]
    DuplicateOption(String),

    /// A catalog API record could not be converted.
    #[error(transparent)]
    Price(#[from] MoneyParseError),
}

/// Source of products and customization options.
pub trait CatalogProvider<'a> {
    /// Look up a product by code.
    fn product(&self, code: &str) -> Option<&Product<'a>>;

    /// Reference customization options.
    fn customization_options(&self) -> &[CustomizationOption<'a>];
}

/// In-memory catalog in a single currency.
#[derive(Debug)]
pub struct Catalog<'a> {
    currency: &'static Currency,
    products: SlotMap<ProductKey, Product<'a>>,
    product_keys: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
    options: Vec<CustomizationOption<'a>>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            products: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            order: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Build a catalog from catalog API records.
    ///
    /// Inactive products, prices and options are left out; options are ordered
    /// by their display order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a price cannot be converted or a record is duplicated.
    pub fn from_records(
        products: &[ProductRecord],
        options: &[CustomizationOptionRecord],
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        let mut option_records: Vec<&CustomizationOptionRecord> = options.iter().collect();
        option_records.sort_by_key(|record| record.display_order);

        for record in option_records {
            if let Some(option) = CustomizationOption::from_record(record, currency)? {
                catalog.insert_option(option)?;
            }
        }

        for record in products {
            if let Some(product) = Product::from_record(record, currency)? {
                catalog.insert_product(product)?;
            }
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a price currency differs from the catalog
    /// currency or the product code is already present.
    pub fn insert_product(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.product_keys.contains_key(&product.code) {
            return Err(CatalogError::DuplicateProduct(product.code));
        }

        if let Some(price) = product
            .prices
            .iter()
            .find(|price| price.price.currency() != self.currency)
        {
            return Err(CatalogError::CurrencyMismatch(
                format!("{} ({})", product.code, price.size),
                price.price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let code = product.code.clone();
        let key = self.products.insert(product);

        self.product_keys.insert(code, key);
        self.order.push(key);

        Ok(key)
    }

    /// Add a customization option to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the option currency differs from the
    /// catalog currency or the id is already present.
    pub fn insert_option(&mut self, option: CustomizationOption<'a>) -> Result<(), CatalogError> {
        if self.options.iter().any(|existing| existing.id == option.id) {
            return Err(CatalogError::DuplicateOption(option.id));
        }

        if option.price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                option.id,
                option.price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.options.push(option);

        Ok(())
    }

    /// Look up a product by code, mutably.
    pub fn product_mut(&mut self, code: &str) -> Option<&mut Product<'a>> {
        let key = self.product_keys.get(code)?;

        self.products.get_mut(*key)
    }

    /// Look up a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Iterate over the products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Distinct product categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();

        self.products()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl<'a> CatalogProvider<'a> for Catalog<'a> {
    fn product(&self, code: &str) -> Option<&Product<'a>> {
        let key = self.product_keys.get(code)?;

        self.products.get(*key)
    }

    fn customization_options(&self) -> &[CustomizationOption<'a>] {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn product<'a>(code: &str, category: &str) -> Product<'a> {
        let mut product = Product::new(code, LocalizedName::new(code, code), category);

        product.prices = vec![SizePrice::new("small", Money::from_minor(300, GBP))];

        product
    }

    #[test]
    fn insert_and_lookup_products() -> TestResult {
        let mut catalog = Catalog::new(GBP);

        let key = catalog.insert_product(product("latte", "Coffee"))?;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(key).map(|product| product.code.as_str()), Some("latte"));
        assert_eq!(
            catalog.product("latte").map(|product| product.category.as_str()),
            Some("Coffee")
        );
        assert!(catalog.product("missing").is_none());

        Ok(())
    }

    #[test]
    fn duplicate_product_codes_are_rejected() -> TestResult {
        let mut catalog = Catalog::new(GBP);

        catalog.insert_product(product("latte", "Coffee"))?;

        assert_eq!(
            catalog.insert_product(product("latte", "Coffee")),
            Err(CatalogError::DuplicateProduct("latte".to_string()))
        );

        Ok(())
    }

    #[test]
    fn product_currency_must_match() {
        let mut catalog = Catalog::new(USD);

        let result = catalog.insert_product(product("latte", "Coffee"));

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(
                "latte (small)".to_string(),
                "GBP",
                "USD"
            ))
        );
    }

    #[test]
    fn option_currency_must_match() {
        let mut catalog = Catalog::new(USD);

        let option = CustomizationOption::new(
            "extra_shot",
            LocalizedName::new("Extra Shot", "شوت إضافي"),
            Money::from_minor(50, GBP),
        );

        assert!(matches!(
            catalog.insert_option(option),
            Err(CatalogError::CurrencyMismatch(..))
        ));
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() -> TestResult {
        let mut catalog = Catalog::new(GBP);

        catalog.insert_product(product("latte", "Coffee"))?;
        catalog.insert_product(product("matcha", "Tea"))?;
        catalog.insert_product(product("mocha", "Coffee"))?;

        assert_eq!(catalog.categories(), ["Coffee", "Tea"]);

        let codes: Vec<&str> = catalog.products().map(|product| product.code.as_str()).collect();

        assert_eq!(codes, ["latte", "matcha", "mocha"]);

        Ok(())
    }

    #[test]
    fn product_mut_allows_local_updates() -> TestResult {
        let mut catalog = Catalog::new(GBP);

        catalog.insert_product(product("latte", "Coffee"))?;

        if let Some(latte) = catalog.product_mut("latte") {
            latte.caffeine_index = 0;
        }

        assert!(
            catalog
                .product("latte")
                .is_some_and(Product::is_caffeine_free)
        );

        Ok(())
    }

    #[test]
    fn from_records_orders_options_and_skips_inactive() -> TestResult {
        let options: Vec<CustomizationOptionRecord> = serde_norway::from_str(
            r#"[
                { "customizationOptionId": 2, "optionCode": "OAT", "nameEn": "Oat Milk",
                  "nameAr": "حليب الشوفان", "price": 1.5, "isActive": true, "displayOrder": 2 },
                { "customizationOptionId": 1, "optionCode": "SHOT", "nameEn": "Extra Shot",
                  "nameAr": "شوت إضافي", "price": 1, "isActive": true, "displayOrder": 1 },
                { "customizationOptionId": 3, "optionCode": "OLD", "nameEn": "Old",
                  "nameAr": "قديم", "price": 1, "isActive": false, "displayOrder": 0 }
            ]"#,
        )?;

        let products: Vec<ProductRecord> = serde_norway::from_str(
            r#"[
                { "productId": 1, "productCode": "latte", "nameEn": "Latte", "nameAr": "لاتيه",
                  "categoryName": "Coffee", "caffeineIndex": 3, "isCustomizable": true,
                  "isActive": true, "prices": [ { "size": "Small", "price": 3, "isActive": true } ] },
                { "productId": 2, "productCode": "retired", "nameEn": "Retired", "nameAr": "قديم",
                  "categoryName": "Coffee", "caffeineIndex": 3, "isCustomizable": false,
                  "isActive": false, "prices": [] }
            ]"#,
        )?;

        let catalog = Catalog::from_records(&products, &options, GBP)?;

        let option_ids: Vec<&str> = catalog
            .customization_options()
            .iter()
            .map(|option| option.id.as_str())
            .collect();

        assert_eq!(option_ids, ["1", "2"]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog
                .product("latte")
                .and_then(|product| product.price_for("small")),
            Some(&Money::from_minor(300, GBP))
        );

        Ok(())
    }
}
