//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{OriginalUri, Path, Query, State};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::shopify::types::{Collection, CollectionSummary};
use crate::state::AppState;

use super::products::{ProductCardView, cards};
use internal_war_core::variant::locale_prefix;

use super::{HandlePath, PageQuery, PaginationView};

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub collections: Vec<CollectionSummary>,
    /// `/collections`, or `/{locale}/collections` on a localized listing.
    pub base_path: String,
    pub pagination: PaginationView,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub collection: Collection,
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationView,
}

/// Display collection listing page.
#[instrument(skip(state, uri))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<CollectionsIndexTemplate> {
    let connection = state
        .storefront()
        .get_collections(query.page(state.config().page_size))
        .await?;

    let base_path = uri.path().trim_end_matches('/').to_string();
    Ok(CollectionsIndexTemplate {
        pagination: PaginationView::new(&base_path, &[], &connection.page_info),
        collections: connection.collections,
        base_path,
    })
}

/// Display collection detail page.
#[instrument(skip(state, uri), fields(handle = %handle))]
pub async fn show(
    State(state): State<AppState>,
    Path(HandlePath { handle }): Path<HandlePath>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<CollectionShowTemplate> {
    let collection = state
        .storefront()
        .get_collection(&handle, query.page(state.config().page_size))
        .await?;

    Ok(CollectionShowTemplate {
        products: cards(&collection.products.products, locale_prefix(uri.path())),
        pagination: PaginationView::new(uri.path(), &[], &collection.products.page_info),
        collection,
    })
}
