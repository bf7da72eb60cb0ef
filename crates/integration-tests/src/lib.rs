//! Integration tests for the Internal War storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p internal-war-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_reconciliation` - optimistic cart sessions across submit,
//!   confirm, fail and refresh
//! - `variant_selection` - product page landing and option pickers
//! - `storefront_routes` - the router end to end, against a local stand-in
//!   for the Storefront API where a page needs catalog data
//!
//! Shared fixtures live here so each test file builds carts and products
//! the same way.

use std::time::Duration;

use internal_war_core::cart::{CartLine, CartSnapshot, Merchandise};
use internal_war_core::variant::{ProductOption, ProductVariant, SelectedOption, VariantGraph};
use internal_war_core::{CartId, CartLineId, MerchandiseId, Money};
use internal_war_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use secrecy::SecretString;

/// Configuration pointing at a store the tests never call.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        page_size: 8,
        cart_idle: Duration::from_secs(60),
        shopify: ShopifyStorefrontConfig {
            store: "internal-war-test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("shpat_9f8Kq2LmZx7Rt4Vb"),
            api_url: None,
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// USD amount from a decimal string.
///
/// # Panics
///
/// Panics if `amount` is not a decimal.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn usd(amount: &str) -> Money {
    Money::parse(amount, "USD").unwrap()
}

/// A hoodie variant with the given size and color.
#[must_use]
pub fn hoodie_variant(id: u32, color: &str, size: &str, available: bool) -> ProductVariant {
    ProductVariant {
        id: MerchandiseId::new(format!("gid://shopify/ProductVariant/{id}")),
        title: format!("{color} / {size}"),
        available_for_sale: available,
        price: usd("65.00"),
        compare_at_price: None,
        selected_options: vec![
            SelectedOption::new("Color", color),
            SelectedOption::new("Size", size),
        ],
        image_url: None,
    }
}

/// Hoodie options as Shopify returns them (sizes out of order).
#[must_use]
pub fn hoodie_options() -> Vec<ProductOption> {
    vec![
        ProductOption::new("Color", ["Black", "Bone"]),
        ProductOption::new("Size", ["XL", "S", "M", "L"]),
    ]
}

/// Black in every size, Bone only in S and M. Black / L is sold out.
///
/// # Panics
///
/// Panics if the fixture variants don't fit the options.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn hoodie_graph() -> VariantGraph {
    VariantGraph::new(
        hoodie_options(),
        vec![
            hoodie_variant(1, "Black", "S", true),
            hoodie_variant(2, "Black", "M", true),
            hoodie_variant(3, "Black", "L", false),
            hoodie_variant(4, "Black", "XL", true),
            hoodie_variant(5, "Bone", "S", true),
            hoodie_variant(6, "Bone", "M", true),
        ],
    )
    .unwrap()
}

/// Merchandise for a hoodie variant.
#[must_use]
pub fn hoodie(id: u32, color: &str, size: &str) -> Merchandise {
    Merchandise::from_variant("core-hoodie", "Core Hoodie", &hoodie_variant(id, color, size, true))
}

/// A confirmed line for `merchandise`.
#[must_use]
pub fn line(id: u32, merchandise: Merchandise, quantity: u32) -> CartLine {
    CartLine {
        id: CartLineId::new(format!("gid://shopify/CartLine/{id}")),
        cost: merchandise.price.times(quantity),
        merchandise,
        quantity,
    }
}

/// A cart holding `lines`, totals computed from them.
#[must_use]
pub fn cart(lines: Vec<CartLine>) -> CartSnapshot {
    let total_quantity = lines.iter().map(|l| l.quantity).sum();
    let subtotal = lines
        .iter()
        .fold(usd("0.00"), |total, l| total.plus(l.cost));
    CartSnapshot {
        id: CartId::new("gid://shopify/Cart/c1"),
        checkout_url: "https://internal-war-test.myshopify.com/cart/c/c1".to_string(),
        lines,
        total_quantity,
        subtotal,
        discount_codes: Vec::new(),
    }
}
