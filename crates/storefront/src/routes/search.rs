//! Product search.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::shopify::types::PageRequest;
use crate::state::AppState;

use super::PaginationView;
use super::products::{ProductCardView, cards};

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl SearchQuery {
    /// The trimmed search terms, if any.
    #[must_use]
    pub fn terms(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Search results page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationView,
}

/// Display search results. An empty query renders the bare search form.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let Some(terms) = query.terms() else {
        return Ok(SearchTemplate {
            query: String::new(),
            products: Vec::new(),
            pagination: PaginationView::default(),
        });
    };

    let page = PageRequest::from_cursors(
        state.config().page_size,
        query.after.clone(),
        query.before.clone(),
    );
    let connection = state
        .storefront()
        .get_products(page, Some(terms.to_string()))
        .await?;

    Ok(SearchTemplate {
        query: terms.to_string(),
        products: cards(&connection.products, None),
        pagination: PaginationView::new("/search", &[("q", terms)], &connection.page_info),
    })
}
