//! Cache types for Storefront API responses.

use internal_war_core::variant::{ProductVariant, Selection};

use crate::shopify::types::{
    Collection, CollectionConnection, PageRequest, Product, ProductConnection,
};

/// Cache key for catalog reads. Carts are never cached.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Critical product data; the selected variant depends on the selection.
    Product { handle: String, selection: Selection },
    Variants(String),
    Products(PageRequest),
    Collection { handle: String, page: PageRequest },
    Collections(PageRequest),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Variants(Vec<ProductVariant>),
    Products(ProductConnection),
    Collection(Box<Collection>),
    Collections(CollectionConnection),
}
