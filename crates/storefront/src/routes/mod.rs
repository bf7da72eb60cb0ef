//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing (cursor paginated)
//! GET  /products/{handle}      - Product detail with option pickers
//! GET  /collections            - Collection listing
//! GET  /collections/{handle}   - Collection detail (cursor paginated)
//! GET  /search?q=              - Product search (cursor paginated)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/lines             - Cart lines fragment
//! GET  /cart/count             - Cart count badge fragment
//! POST /cart/add               - Add to cart (creates the cart on first add)
//! POST /cart/update            - Update quantity (returns cart lines fragment)
//! POST /cart/remove            - Remove line (returns cart lines fragment)
//! POST /cart/discount          - Apply or clear a discount code
//!
//! # Checkout
//! GET  /checkout               - Redirect to Shopify checkout
//!
//! # Localized catalog
//! GET  /{locale}/products/...    - Product routes under a locale (e.g. en-us)
//! GET  /{locale}/collections/... - Collection routes under a locale
//! ```

pub mod cart;
pub mod collections;
pub mod home;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::middleware::require_locale;

use crate::shopify::types::{PageInfo, PageRequest};
use crate::state::AppState;

/// `{handle}` of a catalog route. Mounted with and without a `{locale}`
/// segment, which is ignored here.
#[derive(Debug, Deserialize)]
pub struct HandlePath {
    pub handle: String,
}

// =============================================================================
// Pagination
// =============================================================================

/// `?after=` / `?before=` cursors of a listing page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub after: Option<String>,
    pub before: Option<String>,
}

impl PageQuery {
    #[must_use]
    pub fn page(&self, count: u32) -> PageRequest {
        PageRequest::from_cursors(count, self.after.clone(), self.before.clone())
    }
}

/// Previous/next links for a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationView {
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PaginationView {
    /// Links for `path`, keeping `params` (e.g., the search query) on both.
    #[must_use]
    pub fn new(path: &str, params: &[(&str, &str)], page_info: &PageInfo) -> Self {
        let link = |cursor_name: &str, cursor: &str| {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            query.extend_pairs(params);
            query.append_pair(cursor_name, cursor);
            format!("{path}?{}", query.finish())
        };

        Self {
            previous_url: page_info
                .start_cursor
                .as_deref()
                .filter(|_| page_info.has_previous_page)
                .map(|c| link("before", c)),
            next_url: page_info
                .end_cursor
                .as_deref()
                .filter(|_| page_info.has_next_page)
                .map(|c| link("after", c)),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.previous_url.is_none() && self.next_url.is_none()
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/lines", get(cart::lines))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/discount", post(cart::discount))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/search", get(search::search))
        .route("/checkout", get(cart::checkout))
        .nest("/products", product_routes())
        .nest("/collections", collection_routes())
        .nest(
            "/{locale}/products",
            product_routes().route_layer(axum::middleware::from_fn(require_locale)),
        )
        .nest(
            "/{locale}/collections",
            collection_routes().route_layer(axum::middleware::from_fn(require_locale)),
        )
        .nest("/cart", cart_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_info(previous: bool, next: bool) -> PageInfo {
        PageInfo {
            has_next_page: next,
            has_previous_page: previous,
            start_cursor: Some("start".into()),
            end_cursor: Some("end".into()),
        }
    }

    #[test]
    fn test_pagination_links() {
        let view = PaginationView::new("/collections/hoodies", &[], &page_info(true, true));
        assert_eq!(
            view.previous_url.as_deref(),
            Some("/collections/hoodies?before=start")
        );
        assert_eq!(
            view.next_url.as_deref(),
            Some("/collections/hoodies?after=end")
        );
    }

    #[test]
    fn test_pagination_keeps_params() {
        let view = PaginationView::new("/search", &[("q", "black tee")], &page_info(false, true));
        assert!(view.previous_url.is_none());
        assert_eq!(view.next_url.as_deref(), Some("/search?q=black+tee&after=end"));
    }

    #[test]
    fn test_single_page_has_no_links() {
        assert!(PaginationView::new("/products", &[], &page_info(false, false)).is_empty());
    }

    #[test]
    fn test_page_query() {
        let query = PageQuery {
            after: Some("abc".into()),
            before: None,
        };
        assert_eq!(
            query.page(8),
            PageRequest::Forward {
                count: 8,
                after: Some("abc".into())
            }
        );
    }
}
