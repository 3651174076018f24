//! Integration tests for the shipped `dr-coffee` catalog fixture.
//!
//! Prices in the fixture are whole dinars, so expectations are built with
//! `Money::from_major` to stay independent of the currency exponent.

use rusty_money::{Money, iso::IQD};
use testresult::TestResult;

use coffee_cart::{
    catalog::CatalogProvider,
    fixtures::Fixture,
    items::{LineItemCandidate, LineItemError},
    menu::{MenuFilter, MenuQuery, filter_menu},
    money::format_amount,
};

#[test]
fn fixture_loads_in_dinars() -> TestResult {
    let catalog = Fixture::from_set("dr-coffee")?.into_catalog()?;

    assert_eq!(catalog.currency(), IQD);
    assert_eq!(catalog.len(), 10);
    assert_eq!(
        catalog.categories(),
        ["Hot Coffee", "Cold Coffee", "Tea", "Refreshers"]
    );
    assert_eq!(catalog.customization_options().len(), 5);

    Ok(())
}

#[test]
fn variant_price_keys_are_not_sizes() -> TestResult {
    let catalog = Fixture::from_set("dr-coffee")?.into_catalog()?;

    let mocha = catalog.product("HC04").ok_or("missing mocha")?;
    let sizes: Vec<&str> = mocha.available_sizes().collect();

    assert_eq!(sizes, ["medium"]);
    assert_eq!(
        mocha.price_for("medium with cream"),
        Some(&Money::from_major(4000, IQD))
    );

    Ok(())
}

#[test]
fn linked_options_limit_what_a_product_offers() -> TestResult {
    let catalog = Fixture::from_set("dr-coffee")?.into_catalog()?;

    let espresso = catalog.product("HC01").ok_or("missing espresso")?;

    let candidate = LineItemCandidate::from_catalog(
        &catalog,
        "HC01",
        "double",
        ["extra_shot", "oat_milk"],
    )?;

    assert_eq!(
        espresso
            .customization_options(catalog.customization_options())
            .len(),
        1
    );
    assert_eq!(candidate.id().as_str(), r#"HC01-double-["extra_shot"]"#);

    Ok(())
}

#[test]
fn unknown_size_is_rejected() -> TestResult {
    let catalog = Fixture::from_set("dr-coffee")?.into_catalog()?;

    assert_eq!(
        LineItemCandidate::from_catalog(&catalog, "HC02", "venti", [""; 0]),
        Err(LineItemError::UnknownSize(
            "HC02".to_string(),
            "venti".to_string()
        ))
    );

    Ok(())
}

#[test]
fn menu_filters_over_fixture() -> TestResult {
    let catalog = Fixture::from_set("dr-coffee")?.into_catalog()?;

    let caffeine_free: Vec<&str> =
        filter_menu(&catalog, &MenuQuery::new().filter(MenuFilter::CaffeineFree))
            .map(|product| product.code.as_str())
            .collect();

    assert_eq!(caffeine_free, ["TE02", "RF01", "RF02"]);

    let cold_lattes: Vec<&str> = filter_menu(
        &catalog,
        &MenuQuery::new().search("latte").filter(MenuFilter::Cold),
    )
    .map(|product| product.code.as_str())
    .collect();

    assert_eq!(cold_lattes, ["CC01"]);

    Ok(())
}

#[test]
fn price_edit_applies_to_catalog_only() -> TestResult {
    let mut catalog = Fixture::from_set("dr-coffee")?.into_catalog()?;

    let before = LineItemCandidate::from_catalog(&catalog, "HC02", "medium", [""; 0])?;

    let latte = catalog.product_mut("HC02").ok_or("missing latte")?;
    let edit = latte
        .edit_price("medium", Money::from_major(3250, IQD))?
        .ok_or("expected an edit")?;

    assert_eq!(edit.prices().len(), 3);

    edit.apply(latte)?;

    let after = LineItemCandidate::from_catalog(&catalog, "HC02", "medium", [""; 0])?;

    assert_eq!(format_amount(before.unit_price()), "3,000 IQD");
    assert_eq!(format_amount(after.unit_price()), "3,250 IQD");

    Ok(())
}
