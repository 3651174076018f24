//! Customization Options

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::money::{MoneyParseError, to_minor_units};

/// A display name in both storefront languages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalizedName {
    /// English name
    pub en: String,

    /// Arabic name
    pub ar: String,
}

impl LocalizedName {
    /// Create a new localized name.
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Get the name in the given language.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.en,
            Language::Arabic => &self.ar,
        }
    }
}

/// Storefront display language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    /// English
    #[default]
    English,

    /// Arabic
    Arabic,
}

/// An optional add-on with its own price (e.g. an extra shot).
#[derive(Clone, Debug, PartialEq)]
pub struct CustomizationOption<'a> {
    /// Option identifier
    pub id: String,

    /// Display name
    pub name: LocalizedName,

    /// Price added to the line's unit price
    pub price: Money<'a, Currency>,
}

impl<'a> CustomizationOption<'a> {
    /// Create a new customization option.
    pub fn new(id: impl Into<String>, name: LocalizedName, price: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            name,
            price,
        }
    }

    /// Build an option from a catalog API record.
    ///
    /// Returns `Ok(None)` for inactive options.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyParseError`] if the record price is not representable
    /// in the catalog currency.
    pub fn from_record(
        record: &CustomizationOptionRecord,
        currency: &'a Currency,
    ) -> Result<Option<Self>, MoneyParseError> {
        if !record.is_active {
            return Ok(None);
        }

        let minor_units = to_minor_units(record.price, currency)?;

        Ok(Some(Self {
            id: record.customization_option_id.to_string(),
            name: LocalizedName::new(record.name_en.clone(), record.name_ar.clone()),
            price: Money::from_minor(minor_units, currency),
        }))
    }
}

/// Customization option as returned by the catalog API.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationOptionRecord {
    /// Numeric option id
    pub customization_option_id: u64,

    /// Option code
    pub option_code: String,

    /// English name
    pub name_en: String,

    /// Arabic name
    pub name_ar: String,

    /// Price in major units
    pub price: Decimal,

    /// Whether the option is offered
    pub is_active: bool,

    /// Position in option lists
    #[serde(default)]
    pub display_order: i32,
}

/// Resolved customization snapshots for one line item.
pub type Customizations<'a> = SmallVec<[CustomizationOption<'a>; 4]>;

/// Resolve customization ids against the reference options.
///
/// Unknown ids are dropped; the option may have been deactivated since the
/// id was chosen. Repeated ids resolve once. Output follows input order.
pub fn resolve_customizations<'a, I, S>(
    ids: I,
    options: &[CustomizationOption<'a>],
) -> Customizations<'a>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = FxHashSet::default();

    ids.into_iter()
        .filter_map(|id| {
            let id = id.as_ref();

            if !seen.insert(id.to_string()) {
                return None;
            }

            let option = options.iter().find(|option| option.id == id);

            if option.is_none() {
                debug!(customization = id, "dropping unknown customization");
            }

            option.cloned()
        })
        .collect()
}
