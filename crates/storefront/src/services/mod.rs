//! Stateful services behind the route handlers.
//!
//! - `cart_sessions` - per-visitor optimistic cart state and the
//!   submit/send/reconcile cycle for cart mutations

pub mod cart_sessions;

pub use cart_sessions::{CartSessions, MutationOutcome, SharedCartSession};
