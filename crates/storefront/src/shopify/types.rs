//! Storefront-facing types returned by [`super::StorefrontClient`].
//!
//! Variant, cart and money types come from `internal_war_core`; the types
//! here cover the catalog data only the storefront renders.

use serde::{Deserialize, Serialize};

use internal_war_core::variant::{ProductOption, ProductVariant, SelectedOption};
use internal_war_core::{CartLineId, MerchandiseId, Money, ProductId};

// =============================================================================
// Shared Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// Pagination information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// Cursor for the first item.
    pub start_cursor: Option<String>,
    /// Cursor for the last item.
    pub end_cursor: Option<String>,
}

/// Which page of a connection to fetch.
///
/// Forward pages use `first`/`after`, backward pages `last`/`before`, as
/// the Storefront API requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageRequest {
    Forward { count: u32, after: Option<String> },
    Backward { count: u32, before: String },
}

impl PageRequest {
    /// Page from the `after`/`before` query parameters of a listing URL.
    ///
    /// `before` wins when both are present; empty cursors are ignored.
    #[must_use]
    pub fn from_cursors(count: u32, after: Option<String>, before: Option<String>) -> Self {
        match before.filter(|c| !c.is_empty()) {
            Some(before) => Self::Backward { count, before },
            None => Self::Forward {
                count,
                after: after.filter(|c| !c.is_empty()),
            },
        }
    }

    /// The first page.
    #[must_use]
    pub const fn first(count: u32) -> Self {
        Self::Forward { count, after: None }
    }

    /// GraphQL variables (`first`, `last`, `after`, `before`).
    #[must_use]
    pub fn variables(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut vars = serde_json::Map::new();
        match self {
            Self::Forward { count, after } => {
                vars.insert("first".into(), (*count).into());
                if let Some(after) = after {
                    vars.insert("after".into(), after.clone().into());
                }
            }
            Self::Backward { count, before } => {
                vars.insert("last".into(), (*count).into());
                vars.insert("before".into(), before.clone().into());
            }
        }
        vars
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Product card data for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    pub title: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    pub featured_image: Option<Image>,
    /// Lowest variant price.
    pub price: Money,
    /// Lowest compare-at price, if any variant has one.
    pub compare_at_price: Option<Money>,
    /// Options of the first variant; cards link straight to it.
    pub default_options: Vec<SelectedOption>,
}

/// Product detail page data.
///
/// Holds only what the critical product query returns. The full variant
/// list is loaded separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    pub title: String,
    pub vendor: String,
    /// HTML description.
    pub description_html: String,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    /// Option axes in server order.
    pub options: Vec<ProductOption>,
    /// Variant matching the requested selection, resolved by Shopify.
    pub selected_variant: Option<ProductVariant>,
    /// First variant in server order.
    pub first_variant: Option<ProductVariant>,
}

/// Paginated list of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConnection {
    pub products: Vec<ProductSummary>,
    pub page_info: PageInfo,
}

// =============================================================================
// Collection Types
// =============================================================================

/// Collection card data for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    /// URL handle.
    pub handle: String,
    pub title: String,
    /// Plain text description.
    pub description: String,
    pub image: Option<Image>,
}

/// A collection with one page of its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    /// URL handle.
    pub handle: String,
    pub title: String,
    /// Plain text description.
    pub description: String,
    pub image: Option<Image>,
    pub products: ProductConnection,
}

/// Paginated list of collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConnection {
    pub collections: Vec<CollectionSummary>,
    pub page_info: PageInfo,
}

// =============================================================================
// Cart Input Types
// =============================================================================

/// Line to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: MerchandiseId,
    pub quantity: u32,
}

impl CartLineInput {
    #[must_use]
    pub const fn new(merchandise_id: MerchandiseId, quantity: u32) -> Self {
        Self {
            merchandise_id,
            quantity,
        }
    }
}

/// New quantity for an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineUpdateInput {
    pub id: CartLineId,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_prefers_before() {
        let page = PageRequest::from_cursors(8, Some("a".into()), Some("b".into()));
        assert_eq!(
            page,
            PageRequest::Backward {
                count: 8,
                before: "b".into()
            }
        );

        let vars = page.variables();
        assert_eq!(vars.get("last"), Some(&serde_json::json!(8)));
        assert_eq!(vars.get("before"), Some(&serde_json::json!("b")));
        assert!(vars.get("first").is_none());
    }

    #[test]
    fn test_page_request_ignores_empty_cursors() {
        let page = PageRequest::from_cursors(8, Some(String::new()), Some(String::new()));
        assert_eq!(page, PageRequest::first(8));

        let vars = page.variables();
        assert_eq!(vars.get("first"), Some(&serde_json::json!(8)));
        assert!(vars.get("after").is_none());
    }

    #[test]
    fn test_cart_line_input_serializes_camel_case() {
        let input = CartLineInput::new(MerchandiseId::new("gid://shopify/ProductVariant/1"), 2);
        assert_eq!(
            serde_json::to_value(&input).ok(),
            Some(serde_json::json!({
                "merchandiseId": "gid://shopify/ProductVariant/1",
                "quantity": 2
            }))
        );
    }
}
