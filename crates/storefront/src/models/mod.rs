//! Types stored outside the Shopify API.

pub mod session;

pub use session::keys as session_keys;
