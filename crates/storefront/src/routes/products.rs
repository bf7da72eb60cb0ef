//! Product route handlers.
//!
//! The detail page resolves the URL's option selection against the full
//! variant list. Selections that resolve to nothing redirect to the first
//! variant's canonical URL.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{instrument, warn};

use internal_war_core::compare_price;
use internal_war_core::variant::{
    Landing, MatchOptions, OptionPicker, ProductVariant, Selection, VariantGraph, VariantLink,
    landing, locale_prefix, option_pickers, resolve_selection,
};

use crate::error::{AppError, Result};
use crate::filters;
use crate::shopify::types::{Image, PageRequest, Product, ProductSummary};
use crate::state::AppState;

use super::{HandlePath, PageQuery, PaginationView};

/// Related products shown under the detail page.
const RELATED_COUNT: usize = 4;

// =============================================================================
// View Types
// =============================================================================

/// Product card display data for listings.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    /// Canonical URL of the first variant, so cards never land on a redirect.
    pub url: String,
    pub image: Option<Image>,
    pub price: String,
    /// Set only when the sale price is lower.
    pub compare_at_price: Option<String>,
    pub available: bool,
}

impl ProductCardView {
    /// Card linking under `locale` when the listing itself is localized.
    #[must_use]
    pub fn new(product: &ProductSummary, locale: Option<&str>) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            url: VariantLink::localized(&product.handle, locale)
                .url_for_options(&product.default_options),
            image: product.featured_image.clone(),
            price: product.price.display(),
            compare_at_price: product
                .compare_at_price
                .as_ref()
                .filter(|c| compare_price(&product.price, Some(c)))
                .map(internal_war_core::Money::display),
            available: product.available_for_sale,
        }
    }
}

/// Cards for a page of products.
#[must_use]
pub fn cards(products: &[ProductSummary], locale: Option<&str>) -> Vec<ProductCardView> {
    products
        .iter()
        .map(|p| ProductCardView::new(p, locale))
        .collect()
}

/// The selected variant as the detail page renders it.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub available: bool,
    pub image_url: Option<String>,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            title: variant.title.clone(),
            price: variant.price.display(),
            compare_at_price: variant
                .compare_at_price
                .as_ref()
                .filter(|c| compare_price(&variant.price, Some(c)))
                .map(internal_war_core::Money::display),
            available: variant.available_for_sale,
            image_url: variant.image_url.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub variant: VariantView,
    pub pickers: Vec<OptionPicker>,
    pub related_products: Vec<ProductCardView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display product listing page.
#[instrument(skip(state, uri))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<ProductsIndexTemplate> {
    let connection = state
        .storefront()
        .get_products(query.page(state.config().page_size), None)
        .await?;

    Ok(ProductsIndexTemplate {
        products: cards(&connection.products, locale_prefix(uri.path())),
        pagination: PaginationView::new(uri.path(), &[], &connection.page_info),
    })
}

/// Display product detail page.
///
/// The product itself is critical (missing means 404). The variant list
/// and related products degrade: without variants the pickers render
/// disabled and the server-resolved variant is used.
#[instrument(skip(state, uri), fields(handle = %handle))]
pub async fn show(
    State(state): State<AppState>,
    Path(HandlePath { handle }): Path<HandlePath>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response> {
    let selection = Selection::from_query(uri.query().unwrap_or_default());
    let storefront = state.storefront();

    let (product, variants, related) = tokio::join!(
        storefront.get_product(&handle, &selection),
        storefront.get_product_variants(&handle),
        storefront.get_products(PageRequest::first(state.config().page_size), None),
    );
    let product = product?;

    let variants = variants.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load product variants");
        Vec::new()
    });
    let graph = VariantGraph::new(product.options.clone(), variants).unwrap_or_else(|e| {
        warn!(error = %e, "Inconsistent product variants, rendering without them");
        VariantGraph::options_only(product.options.clone())
    });

    let locale = locale_prefix(uri.path());
    let link = VariantLink::from_request(&handle, uri.path(), uri.query(), &product.options);
    let resolved = if graph.has_variants() {
        resolve_selection(&graph, &selection, MatchOptions::default())
    } else {
        product.selected_variant.as_ref()
    };

    let variant = match landing(product.first_variant.as_ref(), resolved, &link) {
        Landing::Selected(variant) => variant,
        Landing::Redirect(url) => {
            return Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response());
        }
        Landing::Unavailable => {
            return Err(AppError::NotFound(format!("Product has no variants: {handle}")));
        }
    };

    let current = Selection::from_options(&variant.selected_options);
    let pickers = option_pickers(&graph, &current, &link);
    let variant = VariantView::from(variant);

    let related_products = related
        .map(|connection| {
            connection
                .products
                .iter()
                .filter(|p| p.handle != handle)
                .take(RELATED_COUNT)
                .map(|p| ProductCardView::new(p, locale))
                .collect()
        })
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load related products");
            Vec::new()
        });

    Ok(ProductShowTemplate {
        product,
        variant,
        pickers,
        related_products,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use internal_war_core::variant::SelectedOption;
    use internal_war_core::{Money, ProductId};

    use super::*;

    fn summary(price: &str, compare_at: Option<&str>) -> ProductSummary {
        ProductSummary {
            id: ProductId::new("gid://shopify/Product/1"),
            handle: "core-tee".into(),
            title: "Core Tee".into(),
            available_for_sale: true,
            featured_image: None,
            price: Money::parse(price, "USD").unwrap(),
            compare_at_price: compare_at.map(|c| Money::parse(c, "USD").unwrap()),
            default_options: vec![
                SelectedOption::new("Color", "Black"),
                SelectedOption::new("Size", "S"),
            ],
        }
    }

    #[test]
    fn test_card_links_to_first_variant() {
        let card = ProductCardView::new(&summary("30.00", None), None);
        assert_eq!(card.url, "/products/core-tee?Color=Black&Size=S");
        assert_eq!(card.price, "$30.00");
    }

    #[test]
    fn test_localized_card_keeps_locale() {
        let card = ProductCardView::new(&summary("30.00", None), Some("en-us"));
        assert_eq!(card.url, "/en-us/products/core-tee?Color=Black&Size=S");
    }

    #[test]
    fn test_card_compare_at_only_when_lower() {
        let card = ProductCardView::new(&summary("30.00", Some("40.00")), None);
        assert_eq!(card.compare_at_price.as_deref(), Some("$40.00"));

        let card = ProductCardView::new(&summary("30.00", Some("30.00")), None);
        assert!(card.compare_at_price.is_none());
    }
}
