//! Products

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

use crate::{
    catalog::options::{CustomizationOption, Customizations, LocalizedName, resolve_customizations},
    money::{MoneyParseError, to_minor_units},
};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Price keys containing any of these describe variants rather than sizes.
const VARIANT_MARKERS: [&str; 3] = ["cream", "with", "without"];

/// Base price for one size of a product.
#[derive(Clone, Debug, PartialEq)]
pub struct SizePrice<'a> {
    /// Size label (e.g. `"medium"`)
    pub size: String,

    /// Base price for the size
    pub price: Money<'a, Currency>,
}

impl<'a> SizePrice<'a> {
    /// Create a new size price.
    pub fn new(size: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            size: size.into(),
            price,
        }
    }
}

/// Product
#[derive(Clone, Debug, PartialEq)]
pub struct Product<'a> {
    /// Product code, used as the product identifier by the storefront
    pub code: String,

    /// Display name
    pub name: LocalizedName,

    /// Menu category
    pub category: String,

    /// Product tags (e.g. `Hot`, `Cold`)
    pub tags: Vec<String>,

    /// Caffeine index, 0 for caffeine-free drinks
    pub caffeine_index: u8,

    /// Whether customization options can be attached
    pub customizable: bool,

    /// Prices in display order
    pub prices: Vec<SizePrice<'a>>,

    /// Flavour notes
    pub flavors: Vec<String>,

    /// Linked customization option ids
    pub customization_option_ids: Vec<String>,

    /// Image reference
    pub image: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a product with no prices, tags or options.
    pub fn new(code: impl Into<String>, name: LocalizedName, category: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name,
            category: category.into(),
            tags: Vec::new(),
            caffeine_index: 0,
            customizable: false,
            prices: Vec::new(),
            flavors: Vec::new(),
            customization_option_ids: Vec::new(),
            image: None,
        }
    }

    /// Build a product from a catalog API record.
    ///
    /// Inactive products yield `Ok(None)`. Inactive prices are skipped and size
    /// labels are lower-cased.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyParseError`] if a price is not representable in the
    /// catalog currency.
    pub fn from_record(
        record: &ProductRecord,
        currency: &'a Currency,
    ) -> Result<Option<Self>, MoneyParseError> {
        if !record.is_active {
            return Ok(None);
        }

        let prices = record
            .prices
            .iter()
            .filter(|price| price.is_active)
            .map(|price| -> Result<_, MoneyParseError> {
                let minor_units = to_minor_units(price.price, currency)?;

                Ok(SizePrice::new(
                    price.size.to_lowercase(),
                    Money::from_minor(minor_units, currency),
                ))
            })
            .collect::<Result<Vec<_>, MoneyParseError>>()?;

        Ok(Some(Self {
            code: record.product_code.clone(),
            name: LocalizedName::new(record.name_en.clone(), record.name_ar.clone()),
            category: record.category_name.clone(),
            tags: record.tags.clone(),
            caffeine_index: record.caffeine_index,
            customizable: record.is_customizable,
            prices,
            flavors: record.flavors.clone(),
            customization_option_ids: record
                .customization_option_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
            image: record.image_url.clone(),
        }))
    }

    /// Base price for the given size.
    pub fn price_for(&self, size: &str) -> Option<&Money<'a, Currency>> {
        self.prices
            .iter()
            .find(|price| price.size == size)
            .map(|price| &price.price)
    }

    /// Sizes a customer can choose, in display order.
    pub fn available_sizes(&self) -> impl Iterator<Item = &str> {
        self.prices
            .iter()
            .map(|price| price.size.as_str())
            .filter(|size| !VARIANT_MARKERS.iter().any(|marker| size.contains(marker)))
    }

    /// Check if the product carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Check if the product is caffeine-free.
    pub fn is_caffeine_free(&self) -> bool {
        self.caffeine_index == 0
    }

    /// Customization options offered for this product.
    ///
    /// Products without linked options offer the full option list.
    pub fn customization_options(
        &self,
        options: &[CustomizationOption<'a>],
    ) -> Customizations<'a> {
        if self.customization_option_ids.is_empty() {
            return options.iter().cloned().collect();
        }

        resolve_customizations(&self.customization_option_ids, options)
    }
}

/// Product as returned by the catalog API.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Numeric product id
    pub product_id: u64,

    /// Product code
    pub product_code: String,

    /// English name
    pub name_en: String,

    /// Arabic name
    pub name_ar: String,

    /// Image URL
    #[serde(default)]
    pub image_url: Option<String>,

    /// Category name
    pub category_name: String,

    /// Caffeine index
    pub caffeine_index: u8,

    /// Whether the product accepts customizations
    pub is_customizable: bool,

    /// Whether the product is listed
    pub is_active: bool,

    /// Prices per size
    pub prices: Vec<ProductPriceRecord>,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Flavour notes
    #[serde(default)]
    pub flavors: Vec<String>,

    /// Linked customization option ids
    #[serde(default)]
    pub customization_option_ids: Vec<u64>,
}

/// Product price as returned by the catalog API.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceRecord {
    /// Size label
    pub size: String,

    /// Price in major units
    pub price: Decimal,

    /// Whether the price is offered
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, IQD};
    use testresult::TestResult;

    use super::*;

    fn latte<'a>() -> Product<'a> {
        let mut product = Product::new("latte", LocalizedName::new("Latte", "لاتيه"), "Coffee");

        product.tags = vec!["Hot".to_string()];
        product.caffeine_index = 3;
        product.prices = vec![
            SizePrice::new("small", Money::from_minor(250, GBP)),
            SizePrice::new("medium", Money::from_minor(300, GBP)),
            SizePrice::new("with cream", Money::from_minor(350, GBP)),
        ];

        product
    }

    #[test]
    fn price_for_known_and_unknown_sizes() {
        let product = latte();

        assert_eq!(product.price_for("medium"), Some(&Money::from_minor(300, GBP)));
        assert_eq!(product.price_for("large"), None);
    }

    #[test]
    fn available_sizes_skip_variant_keys() {
        let product = latte();

        let sizes: Vec<&str> = product.available_sizes().collect();

        assert_eq!(sizes, ["small", "medium"]);
    }

    #[test]
    fn tags_and_caffeine() {
        let mut product = latte();

        assert!(product.has_tag("Hot"));
        assert!(!product.has_tag("Cold"));
        assert!(!product.is_caffeine_free());

        product.caffeine_index = 0;

        assert!(product.is_caffeine_free());
    }

    #[test]
    fn customization_options_fall_back_to_full_list() {
        let options = [
            CustomizationOption::new("1", LocalizedName::default(), Money::from_minor(50, GBP)),
            CustomizationOption::new("2", LocalizedName::default(), Money::from_minor(75, GBP)),
        ];

        let mut product = latte();

        assert_eq!(product.customization_options(&options).len(), 2);

        product.customization_option_ids = vec!["2".to_string(), "9".to_string()];

        let linked = product.customization_options(&options);

        assert_eq!(linked.len(), 1);
        assert_eq!(linked.first().map(|option| option.id.as_str()), Some("2"));
    }

    #[test]
    fn from_record_keeps_active_prices_with_lowercase_sizes() -> TestResult {
        let record: ProductRecord = serde_norway::from_str(
            r#"{
                "productId": 1,
                "productCode": "latte",
                "nameEn": "Latte",
                "nameAr": "لاتيه",
                "categoryName": "Coffee",
                "caffeineIndex": 3,
                "isCustomizable": true,
                "isActive": true,
                "prices": [
                    { "size": "Small", "price": 3000, "isActive": true },
                    { "size": "Large", "price": 4000, "isActive": false }
                ],
                "tags": ["Hot"],
                "customizationOptionIds": [4, 5]
            }"#,
        )?;

        let product = Product::from_record(&record, IQD)?.ok_or("expected an active product")?;

        assert_eq!(product.code, "latte");
        assert_eq!(
            product.prices,
            vec![SizePrice::new("small", Money::from_major(3000, IQD))]
        );
        assert_eq!(product.customization_option_ids, ["4", "5"]);
        assert!(product.customizable);

        Ok(())
    }

    #[test]
    fn from_record_skips_inactive_products() -> TestResult {
        let record: ProductRecord = serde_norway::from_str(
            r#"{
                "productId": 2,
                "productCode": "old",
                "nameEn": "Old",
                "nameAr": "قديم",
                "categoryName": "Coffee",
                "caffeineIndex": 1,
                "isCustomizable": false,
                "isActive": false,
                "prices": []
            }"#,
        )?;

        assert_eq!(Product::from_record(&record, IQD)?, None);

        Ok(())
    }
}
