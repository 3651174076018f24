//! Fixtures

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError, CatalogProvider},
    fixtures::catalog::CatalogFixture,
    money::MoneyParseError,
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price or currency
    #[error(transparent)]
    Price(#[from] MoneyParseError),

    /// A price does not use the fixture currency
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The catalog rejected an entry
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No catalog loaded yet
    #[error("No catalog loaded")]
    NoCatalog,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded catalog
    catalog: Option<Catalog<'a>>,
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
        }
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its prices
    /// are invalid or use more than one currency.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;
        let catalog = fixture.into_catalog()?;

        debug!(
            path = %file_path.display(),
            products = catalog.len(),
            options = catalog.customization_options().len(),
            "loaded catalog fixture"
        );

        self.catalog = Some(catalog);

        Ok(self)
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog has been loaded.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get the loaded catalog, mutably
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog has been loaded.
    pub fn catalog_mut(&mut self) -> Result<&mut Catalog<'a>, FixtureError> {
        self.catalog.as_mut().ok_or(FixtureError::NoCatalog)
    }

    /// Take ownership of the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog has been loaded.
    pub fn into_catalog(self) -> Result<Catalog<'a>, FixtureError> {
        self.catalog.ok_or(FixtureError::NoCatalog)
    }
}
