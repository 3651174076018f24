//! Coffee Cart
//!
//! Shopping cart engine for a coffee shop storefront: configurable drinks with
//! per-size prices and priced customizations, a cart that merges identical
//! configurations, and an order message ready to hand to the shop.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod items;
pub mod menu;
pub mod money;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod receipt;
