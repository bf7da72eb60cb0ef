//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation goes through the visitor's [`CartSession`]: the shopper
//! sees the optimistic result while the Shopify call is in flight, and the
//! confirmed (or reverted) cart once it returns.
//!
//! [`CartSession`]: internal_war_core::cart::CartSession

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};
use uuid::Uuid;

use internal_war_core::cart::{
    DiscountCode, LineControls, Merchandise, MutationKind, OPTIMISTIC_LINE_PREFIX,
    OptimisticCartView, OptimisticLine,
};
use internal_war_core::variant::{Selection, VariantLink};
use internal_war_core::{CartId, CartLineId, MerchandiseId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::visitor_id;
use crate::models::session_keys;
use crate::services::{MutationOutcome, SharedCartSession};
use crate::shopify::ShopifyError;
use crate::shopify::types::{CartLineInput, CartLineUpdateInput};
use crate::state::AppState;

/// HTMX event fired after every confirmed cart change.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub product_title: String,
    /// `None` for products without options.
    pub variant_title: Option<String>,
    pub product_url: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub is_optimistic: bool,
    pub controls: LineControls,
}

impl From<&OptimisticLine> for CartLineView {
    fn from(line: &OptimisticLine) -> Self {
        let merchandise = &line.merchandise;
        Self {
            id: line.id.to_string(),
            product_title: merchandise.product_title.clone(),
            variant_title: (merchandise.title != "Default Title")
                .then(|| merchandise.title.clone()),
            product_url: VariantLink::new(&merchandise.product_handle)
                .url_for_options(&merchandise.selected_options),
            image_url: merchandise.image_url.clone(),
            quantity: line.quantity,
            price: merchandise.price.display(),
            line_price: line.cost.display(),
            is_optimistic: line.is_optimistic,
            controls: line.controls(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    /// `None` before a cart exists.
    pub subtotal: Option<String>,
    pub discount_codes: Vec<DiscountCode>,
    pub has_discount: bool,
    pub checkout_url: Option<String>,
    /// Some line is still waiting on Shopify.
    pub is_pending: bool,
}

impl From<&OptimisticCartView> for CartView {
    fn from(view: &OptimisticCartView) -> Self {
        Self {
            lines: view.lines.iter().map(CartLineView::from).collect(),
            item_count: view.total_quantity,
            subtotal: view.subtotal.as_ref().map(internal_war_core::Money::display),
            discount_codes: view.discount_codes.clone(),
            has_discount: view.has_discount(),
            checkout_url: view.checkout_url.clone(),
            is_pending: view.has_optimistic_lines(),
        }
    }
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub merchandise_id: String,
    pub handle: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    /// Zero or less removes the line.
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Discount code form data. An empty code clears applied codes.
#[derive(Debug, Deserialize)]
pub struct DiscountForm {
    #[serde(default)]
    pub code: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart lines fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_lines.html")]
pub struct CartLinesTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart status fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_to_cart.html")]
pub struct AddToCartTemplate {
    pub count: u32,
    pub error: Option<String>,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the Shopify cart ID from the session.
async fn get_cart_id(session: &Session) -> Result<Option<CartId>> {
    Ok(session.get::<CartId>(session_keys::CART_ID).await?)
}

/// Remember the cart a mutation created or confirmed.
async fn save_cart_id(session: &Session, view: &OptimisticCartView) -> Result<()> {
    if let Some(cart_id) = &view.id {
        session.insert(session_keys::CART_ID, cart_id).await?;
    }
    Ok(())
}

/// The visitor's cart session, seeded from Shopify when it holds no cart.
///
/// With `refresh` set, an idle session is re-fetched even if it already has
/// a snapshot, so full page loads pick up changes made elsewhere (e.g., at
/// checkout). Fetch failures keep whatever state the session has.
async fn load_cart(
    state: &AppState,
    session: &Session,
    refresh: bool,
) -> Result<(Uuid, SharedCartSession)> {
    let visitor = visitor_id(session).await?;
    let shared = state.cart_sessions().get_or_create(visitor).await;

    let (should_fetch, known_id) = {
        let guard = shared.lock().await;
        (
            guard.is_idle() && (refresh || guard.snapshot().is_none()),
            guard.cart_id().cloned(),
        )
    };
    if !should_fetch {
        return Ok((visitor, shared));
    }

    let cart_id = match known_id {
        Some(id) => Some(id),
        None => get_cart_id(session).await?,
    };
    let Some(cart_id) = cart_id else {
        return Ok((visitor, shared));
    };

    match state.storefront().get_cart(&cart_id).await {
        Ok(snapshot) => {
            shared.lock().await.refresh(snapshot);
        }
        Err(ShopifyError::NotFound(_)) => {
            // Expired or completed at checkout
            shared.lock().await.reset();
            session.remove::<CartId>(session_keys::CART_ID).await?;
        }
        Err(e) => warn!(error = %e, "Failed to fetch cart"),
    }

    Ok((visitor, shared))
}

/// Current view of the visitor's cart.
async fn current_view(state: &AppState, session: &Session, refresh: bool) -> Result<CartView> {
    let (_, shared) = load_cart(state, session, refresh).await?;
    let view = shared.lock().await.view();
    Ok(CartView::from(&view))
}

/// Message shown when a mutation fails. Shopify's user errors are meant for
/// shoppers; anything else is not.
fn mutation_error_message(error: &ShopifyError) -> String {
    match error {
        ShopifyError::UserError(message) => message.clone(),
        ShopifyError::RateLimited(_) => "The shop is busy, please try again.".to_string(),
        _ => "Couldn't update your cart. Please try again.".to_string(),
    }
}

/// Render a cart lines fragment for a finished mutation.
async fn lines_response(session: &Session, outcome: MutationOutcome) -> Result<Response> {
    let cart = CartView::from(&outcome.view);
    match outcome.result {
        Ok(_) => {
            save_cart_id(session, &outcome.view).await?;
            Ok((
                AppendHeaders([CART_UPDATED]),
                CartLinesTemplate { cart, error: None },
            )
                .into_response())
        }
        Err(e) => Ok(CartLinesTemplate {
            cart,
            error: Some(mutation_error_message(&e)),
        }
        .into_response()),
    }
}

fn confirmed_line_id(line_id: String) -> Result<CartLineId> {
    if line_id.starts_with(OPTIMISTIC_LINE_PREFIX) {
        return Err(AppError::BadRequest(
            "Line is still being added to the cart".to_string(),
        ));
    }
    Ok(CartLineId::new(line_id))
}

/// Quantities Shopify can hold; zero or less still means remove.
fn checked_quantity(quantity: i64) -> Result<i64> {
    if quantity > i64::from(u32::MAX) {
        return Err(AppError::BadRequest("Quantity is too large".to_string()));
    }
    Ok(quantity)
}

fn no_cart() -> ShopifyError {
    ShopifyError::NotFound("No cart for this session".to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    Ok(CartShowTemplate {
        cart: current_view(&state, &session, true).await?,
    })
}

/// Cart lines fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn lines(State(state): State<AppState>, session: Session) -> Result<CartLinesTemplate> {
    Ok(CartLinesTemplate {
        cart: current_view(&state, &session, false).await?,
        error: None,
    })
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = current_view(&state, &session, false).await?;
    Ok(CartCountTemplate {
        count: cart.item_count,
    })
}

/// Add item to cart (HTMX).
///
/// Creates a new cart if one doesn't exist, or adds to the existing cart.
/// Adding a variant already in the cart increases that line's quantity.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }

    let storefront = state.storefront();
    let merchandise_id = MerchandiseId::new(form.merchandise_id);
    let no_selection = Selection::new();
    let (product, variants) = tokio::join!(
        storefront.get_product(&form.handle, &no_selection),
        storefront.get_product_variants(&form.handle),
    );
    let product = product?;
    let variant = variants?
        .into_iter()
        .find(|v| v.id == merchandise_id)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown variant: {merchandise_id}")))?;
    let merchandise = Merchandise::from_variant(&product.handle, &product.title, &variant);

    let (visitor, _) = load_cart(&state, &session, false).await?;
    add_breadcrumb(
        "cart",
        "Add to cart",
        &[("merchandise_id", merchandise_id.as_str())],
    );

    let outcome = state
        .cart_sessions()
        .mutate(
            visitor,
            MutationKind::Add {
                merchandise,
                quantity,
            },
            |cart_id| async move {
                let lines = vec![CartLineInput::new(merchandise_id, quantity)];
                match cart_id {
                    Some(cart_id) => storefront.add_lines(&cart_id, lines).await,
                    None => storefront.create_cart(lines).await,
                }
            },
        )
        .await;

    let count = outcome.view.total_quantity;
    match outcome.result {
        Ok(_) => {
            save_cart_id(&session, &outcome.view).await?;
            Ok((
                AppendHeaders([CART_UPDATED]),
                AddToCartTemplate { count, error: None },
            )
                .into_response())
        }
        Err(e) => Ok(AddToCartTemplate {
            count,
            error: Some(mutation_error_message(&e)),
        }
        .into_response()),
    }
}

/// Update cart line quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let line_id = confirmed_line_id(form.line_id)?;
    let quantity = checked_quantity(form.quantity)?;
    let (visitor, _) = load_cart(&state, &session, false).await?;
    let storefront = state.storefront();

    let outcome = state
        .cart_sessions()
        .mutate(
            visitor,
            MutationKind::UpdateQuantity {
                line_id: line_id.clone(),
                quantity,
            },
            |cart_id| async move {
                let cart_id = cart_id.ok_or_else(no_cart)?;
                match u32::try_from(quantity) {
                    Ok(quantity) if quantity > 0 => {
                        storefront
                            .update_lines(&cart_id, vec![CartLineUpdateInput {
                                id: line_id,
                                quantity,
                            }])
                            .await
                    }
                    _ => storefront.remove_lines(&cart_id, vec![line_id]).await,
                }
            },
        )
        .await;

    lines_response(&session, outcome).await
}

/// Remove cart line (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let line_id = confirmed_line_id(form.line_id)?;
    let (visitor, _) = load_cart(&state, &session, false).await?;
    let storefront = state.storefront();

    let outcome = state
        .cart_sessions()
        .mutate(
            visitor,
            MutationKind::Remove {
                line_id: line_id.clone(),
            },
            |cart_id| async move {
                let cart_id = cart_id.ok_or_else(no_cart)?;
                storefront.remove_lines(&cart_id, vec![line_id]).await
            },
        )
        .await;

    lines_response(&session, outcome).await
}

/// Apply or clear a discount code (HTMX).
///
/// Discount codes don't change lines, so they bypass the optimistic fold:
/// the returned cart replaces the snapshot only if no line mutation is in
/// flight (whose response will carry the code anyway).
#[instrument(skip(state, session))]
pub async fn discount(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DiscountForm>,
) -> Result<Response> {
    let (_, shared) = load_cart(&state, &session, false).await?;
    let Some(cart_id) = shared.lock().await.cart_id().cloned() else {
        return Ok(CartLinesTemplate {
            cart: CartView::default(),
            error: Some("Add something to your cart first.".to_string()),
        }
        .into_response());
    };

    let code = form.code.trim();
    let codes = if code.is_empty() {
        Vec::new()
    } else {
        vec![code.to_string()]
    };

    let result = state
        .storefront()
        .update_discount_codes(&cart_id, codes)
        .await;

    let mut guard = shared.lock().await;
    let error = match result {
        Ok(snapshot) => {
            guard.refresh(snapshot);
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to update discount codes");
            Some(mutation_error_message(&e))
        }
    };
    let cart = CartView::from(&guard.view());
    drop(guard);

    if error.is_some() {
        return Ok(CartLinesTemplate { cart, error }.into_response());
    }
    Ok((
        AppendHeaders([CART_UPDATED]),
        CartLinesTemplate { cart, error: None },
    )
        .into_response())
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let cart = current_view(&state, &session, true).await?;
    Ok(match cart.checkout_url {
        Some(url) if !cart.is_empty() => Redirect::to(&url),
        _ => Redirect::to("/cart"),
    })
}
