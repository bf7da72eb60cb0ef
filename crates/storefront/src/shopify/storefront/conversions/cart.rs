//! Cart type conversion functions.

use internal_war_core::cart::{CartLine, CartSnapshot, DiscountCode, Merchandise};
use internal_war_core::{CartId, CartLineId, MerchandiseId};

use crate::shopify::ShopifyError;

use super::super::queries::{CartLineNode, CartNode, UserErrorNode};
use super::products::{convert_money, convert_selected_options};

fn convert_quantity(quantity: i64, what: &str) -> Result<u32, ShopifyError> {
    u32::try_from(quantity)
        .map_err(|_| ShopifyError::InvalidData(format!("{what} out of range: {quantity}")))
}

fn convert_line(line: CartLineNode) -> Result<CartLine, ShopifyError> {
    let merchandise = line.merchandise;
    Ok(CartLine {
        id: CartLineId::new(line.id),
        quantity: convert_quantity(line.quantity, "line quantity")?,
        cost: convert_money(&line.cost.total_amount)?,
        merchandise: Merchandise {
            id: MerchandiseId::new(merchandise.id),
            product_handle: merchandise.product.handle,
            product_title: merchandise.product.title,
            title: merchandise.title,
            selected_options: convert_selected_options(merchandise.selected_options),
            price: convert_money(&merchandise.price)?,
            available_for_sale: merchandise.available_for_sale,
            image_url: merchandise.image.map(|i| i.url),
        },
    })
}

/// Convert a cart response into a confirmed snapshot.
///
/// # Errors
///
/// Returns `InvalidData` if an amount doesn't parse or a quantity is negative.
pub fn convert_cart(cart: CartNode) -> Result<CartSnapshot, ShopifyError> {
    Ok(CartSnapshot {
        id: CartId::new(cart.id),
        checkout_url: cart.checkout_url,
        total_quantity: convert_quantity(cart.total_quantity, "total quantity")?,
        subtotal: convert_money(&cart.cost.subtotal_amount)?,
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| DiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        lines: cart
            .lines
            .nodes
            .into_iter()
            .map(convert_line)
            .collect::<Result<_, _>>()?,
    })
}

/// Join mutation user errors into one message.
///
/// Each error reads `message (field.path, CODE)` when those parts exist.
pub fn format_user_errors(errors: &[UserErrorNode]) -> String {
    errors
        .iter()
        .map(|e| {
            let mut context = Vec::new();
            if let Some(field) = e.field.as_ref().filter(|f| !f.is_empty()) {
                context.push(field.join("."));
            }
            if let Some(code) = &e.code {
                context.push(code.clone());
            }
            if context.is_empty() {
                e.message.clone()
            } else {
                format!("{} ({})", e.message, context.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
