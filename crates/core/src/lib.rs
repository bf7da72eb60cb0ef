//! Internal War Core - Storefront domain logic.
//!
//! This crate holds the parts of the storefront that decide what a shopper
//! sees, independent of how the data was fetched. It is used by:
//! - `storefront` - Public-facing shop (axum + Shopify Storefront API)
//! - `integration-tests` - Cross-crate scenario and property tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no shared mutable state. Callers pass the last confirmed cart,
//! the pending mutations and the current selection explicitly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify GIDs and money
//! - [`cart`] - Optimistic cart reconciliation
//! - [`variant`] - Variant resolution and option picker state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;
pub mod variant;

pub use types::*;
