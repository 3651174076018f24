//! Menu
//!
//! Search and filtering over catalog products, in catalog order.

use crate::catalog::{Catalog, Product};

/// Quick filter shown above the menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MenuFilter {
    /// Every product
    #[default]
    All,

    /// Products tagged `Cold`
    Cold,

    /// Products tagged `Hot`
    Hot,

    /// Products with a caffeine index of zero
    CaffeineFree,
}

impl MenuFilter {
    /// Check if a product passes the filter.
    pub fn matches(self, product: &Product<'_>) -> bool {
        match self {
            MenuFilter::All => true,
            MenuFilter::Cold => product.has_tag("Cold"),
            MenuFilter::Hot => product.has_tag("Hot"),
            MenuFilter::CaffeineFree => product.is_caffeine_free(),
        }
    }
}

/// Menu search, quick filter and category selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuQuery {
    search: String,
    filter: MenuFilter,
    category: Option<String>,
}

impl MenuQuery {
    /// A query that matches every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive search over names and product code.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_lowercase();
        self
    }

    /// Quick filter.
    #[must_use]
    pub fn filter(mut self, filter: MenuFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Restrict to one category; `None` selects all.
    #[must_use]
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Check if a product matches every part of the query.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        let matches_search = self.search.is_empty()
            || product.name.en.to_lowercase().contains(&self.search)
            || product.name.ar.to_lowercase().contains(&self.search)
            || product.code.to_lowercase().contains(&self.search);

        let matches_category = self
            .category
            .as_ref()
            .is_none_or(|category| product.category == *category);

        matches_search && matches_category && self.filter.matches(product)
    }
}

/// Products matching the query, in catalog order.
pub fn filter_menu<'c, 'a>(
    catalog: &'c Catalog<'a>,
    query: &MenuQuery,
) -> impl Iterator<Item = &'c Product<'a>> {
    catalog.products().filter(move |product| query.matches(product))
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::catalog::{LocalizedName, SizePrice};

    use super::*;

    fn product<'a>(
        code: &str,
        name: LocalizedName,
        category: &str,
        tags: &[&str],
        caffeine_index: u8,
    ) -> Product<'a> {
        let mut product = Product::new(code, name, category);

        product.tags = tags.iter().map(ToString::to_string).collect();
        product.caffeine_index = caffeine_index;
        product.prices = vec![SizePrice::new("small", Money::from_minor(300, GBP))];

        product
    }

    fn catalog<'a>() -> TestResult<Catalog<'a>> {
        let mut catalog = Catalog::new(GBP);

        catalog.insert_product(product(
            "HL01",
            LocalizedName::new("Hot Latte", "لاتيه حار"),
            "Coffee",
            &["Hot"],
            3,
        ))?;
        catalog.insert_product(product(
            "IL02",
            LocalizedName::new("Iced Latte", "لاتيه مثلج"),
            "Coffee",
            &["Cold"],
            3,
        ))?;
        catalog.insert_product(product(
            "CH03",
            LocalizedName::new("Chamomile", "بابونج"),
            "Tea",
            &["Hot"],
            0,
        ))?;
        catalog.insert_product(product(
            "LM04",
            LocalizedName::new("Lemonade", "ليموناضة"),
            "Refreshers",
            &["Cold"],
            0,
        ))?;

        Ok(catalog)
    }

    fn codes<'c>(catalog: &'c Catalog<'_>, query: &MenuQuery) -> Vec<&'c str> {
        filter_menu(catalog, query)
            .map(|product| product.code.as_str())
            .collect()
    }

    #[test]
    fn empty_query_matches_everything_in_order() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(codes(&catalog, &MenuQuery::new()), ["HL01", "IL02", "CH03", "LM04"]);

        Ok(())
    }

    #[test]
    fn search_is_case_insensitive_over_names_and_code() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(codes(&catalog, &MenuQuery::new().search("LATTE")), ["HL01", "IL02"]);
        assert_eq!(codes(&catalog, &MenuQuery::new().search("بابونج")), ["CH03"]);
        assert_eq!(codes(&catalog, &MenuQuery::new().search("lm04")), ["LM04"]);
        assert_eq!(codes(&catalog, &MenuQuery::new().search("   ")).len(), 4);

        Ok(())
    }

    #[test]
    fn quick_filters() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(
            codes(&catalog, &MenuQuery::new().filter(MenuFilter::Cold)),
            ["IL02", "LM04"]
        );
        assert_eq!(
            codes(&catalog, &MenuQuery::new().filter(MenuFilter::Hot)),
            ["HL01", "CH03"]
        );
        assert_eq!(
            codes(&catalog, &MenuQuery::new().filter(MenuFilter::CaffeineFree)),
            ["CH03", "LM04"]
        );

        Ok(())
    }

    #[test]
    fn category_and_filter_combine() -> TestResult {
        let catalog = catalog()?;

        let query = MenuQuery::new()
            .category(Some("Coffee".to_string()))
            .filter(MenuFilter::Cold);

        assert_eq!(codes(&catalog, &query), ["IL02"]);

        let query = MenuQuery::new()
            .category(Some("Tea".to_string()))
            .search("latte");

        assert!(codes(&catalog, &query).is_empty());

        Ok(())
    }
}
