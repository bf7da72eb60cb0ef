//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod products;

pub use cart::{convert_cart, format_user_errors};
pub use collections::{convert_collection, convert_collection_connection};
pub use products::{convert_product, convert_product_connection, convert_variants};
