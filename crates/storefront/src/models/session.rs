//! Session keys.
//!
//! The cart itself is never stored in the session; Shopify owns it and
//! [`crate::services::CartSessions`] holds the optimistic state.

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the Shopify cart ID.
    pub const CART_ID: &str = "cart_id";

    /// Key for the visitor's entry in the cart session registry.
    pub const VISITOR_ID: &str = "visitor_id";
}
