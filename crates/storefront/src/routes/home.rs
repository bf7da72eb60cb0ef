//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::{instrument, warn};

use crate::filters;
use crate::shopify::types::{CollectionSummary, PageRequest};
use crate::state::AppState;

use super::products::{ProductCardView, cards};

/// Collections featured on the home page.
const FEATURED_COLLECTIONS: u32 = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub collections: Vec<CollectionSummary>,
    pub products: Vec<ProductCardView>,
}

/// Display the home page.
///
/// Both sections are optional; a failed fetch renders the page without it.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    let storefront = state.storefront();
    let (collections, products) = tokio::join!(
        storefront.get_collections(PageRequest::first(FEATURED_COLLECTIONS)),
        storefront.get_products(PageRequest::first(state.config().page_size), None),
    );

    let collections = collections.map(|c| c.collections).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load featured collections");
        Vec::new()
    });
    let products = products.map(|p| cards(&p.products, None)).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load latest products");
        Vec::new()
    });

    HomeTemplate {
        collections,
        products,
    }
}
