//! Cart snapshot and optimistic reconciliation.
//!
//! The server owns the cart. What we hold locally is the last
//! [`CartSnapshot`] a mutation (or fetch) returned, plus the mutations that
//! have been submitted but not yet answered. [`apply_pending`] folds the
//! latter into the former to produce the [`OptimisticCartView`] the shopper
//! sees; [`CartSession`] tracks both sides and reconciles responses.

mod mutation;
mod optimistic;
mod session;

pub use mutation::{MutationId, MutationKind, PendingMutation};
pub use optimistic::{
    LineControls, OPTIMISTIC_LINE_PREFIX, OptimisticCartView, OptimisticLine, apply_pending,
};
pub use session::{CartSession, Reconciled};

use serde::{Deserialize, Serialize};

use crate::types::{CartId, CartLineId, MerchandiseId, Money};
use crate::variant::{ProductVariant, SelectedOption};

/// The variant a cart line points at, as the cart query returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchandise {
    pub id: MerchandiseId,
    pub product_handle: String,
    pub product_title: String,
    /// Variant title (e.g., "Black / M").
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    /// Unit price.
    pub price: Money,
    pub available_for_sale: bool,
    pub image_url: Option<String>,
}

impl Merchandise {
    /// Merchandise for a variant picked on a product page.
    #[must_use]
    pub fn from_variant(
        product_handle: impl Into<String>,
        product_title: impl Into<String>,
        variant: &ProductVariant,
    ) -> Self {
        Self {
            id: variant.id.clone(),
            product_handle: product_handle.into(),
            product_title: product_title.into(),
            title: variant.title.clone(),
            selected_options: variant.selected_options.clone(),
            price: variant.price,
            available_for_sale: variant.available_for_sale,
            image_url: variant.image_url.clone(),
        }
    }
}

/// A confirmed cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub merchandise: Merchandise,
    /// Always positive; the server drops lines set to zero.
    pub quantity: u32,
    /// Line total as computed by the server.
    pub cost: Money,
}

/// A discount code entered on the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    /// Whether the code currently applies to the cart contents.
    pub applicable: bool,
}

/// Server-confirmed cart state.
///
/// Immutable once received; a newer response replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub id: CartId,
    pub checkout_url: String,
    pub lines: Vec<CartLine>,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub discount_codes: Vec<DiscountCode>,
}

impl CartSnapshot {
    #[must_use]
    pub fn line(&self, id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_codes.iter().any(|d| d.applicable)
    }
}
