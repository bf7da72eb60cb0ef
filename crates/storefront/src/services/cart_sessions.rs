//! Registry of per-visitor optimistic cart state.
//!
//! Each visitor's [`CartSession`] lives behind its own async mutex. The
//! lock is held only to submit or reconcile a mutation, never across the
//! Shopify round trip, so several mutations from one visitor can be in
//! flight at once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use internal_war_core::CartId;
use internal_war_core::cart::{
    CartSession, CartSnapshot, MutationId, MutationKind, OptimisticCartView, Reconciled,
};

use crate::shopify::ShopifyError;

/// One visitor's cart state.
pub type SharedCartSession = Arc<Mutex<CartSession>>;

/// Upper bound on tracked visitors.
const MAX_VISITORS: u64 = 100_000;

/// Result of running a mutation through a visitor's session.
#[derive(Debug)]
pub struct MutationOutcome {
    /// The cart to render once the mutation resolved.
    pub view: OptimisticCartView,
    /// How the response was reconciled, or why the mutation failed.
    pub result: Result<Reconciled, ShopifyError>,
}

/// Fails a submitted mutation if its future is dropped before the response
/// is reconciled (client disconnect, request timeout).
struct InFlightMutation {
    session: SharedCartSession,
    id: MutationId,
    tracked: bool,
}

impl InFlightMutation {
    fn new(session: SharedCartSession, id: MutationId) -> Self {
        Self {
            session,
            id,
            tracked: true,
        }
    }

    fn resolved(&mut self) {
        self.tracked = false;
    }
}

impl Drop for InFlightMutation {
    fn drop(&mut self) {
        if !self.tracked {
            return;
        }
        let id = self.id;
        warn!(mutation = %id, "Cart mutation abandoned before its response");

        if let Ok(mut guard) = self.session.try_lock() {
            guard.fail(id);
            return;
        }
        // Drop can't wait for the lock; hand the cleanup to the runtime.
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    session.lock().await.fail(id);
                });
            }
            Err(_) => warn!(mutation = %id, "No runtime to release abandoned cart mutation"),
        }
    }
}

/// Visitor key to cart session, expired after a period of inactivity.
#[derive(Clone)]
pub struct CartSessions {
    cache: Cache<Uuid, SharedCartSession>,
}

impl CartSessions {
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_VISITORS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// The visitor's session, created empty if absent.
    pub async fn get_or_create(&self, visitor: Uuid) -> SharedCartSession {
        self.cache
            .get_with(visitor, async { Arc::new(Mutex::new(CartSession::new())) })
            .await
    }

    /// The visitor's session, if one is tracked.
    pub async fn get(&self, visitor: Uuid) -> Option<SharedCartSession> {
        self.cache.get(&visitor).await
    }

    /// Submit a mutation, send it, and reconcile the response.
    ///
    /// `send` receives the cart ID known at submission time (`None` before
    /// the first cart exists) and performs the Shopify call. The session
    /// lock is released while it runs.
    ///
    /// If the returned future is dropped before the response is reconciled,
    /// the mutation is failed so it doesn't stay in the view.
    pub async fn mutate<F, Fut>(
        &self,
        visitor: Uuid,
        kind: MutationKind,
        send: F,
    ) -> MutationOutcome
    where
        F: FnOnce(Option<CartId>) -> Fut,
        Fut: Future<Output = Result<CartSnapshot, ShopifyError>>,
    {
        let session = self.get_or_create(visitor).await;
        let operation = kind.operation();

        let (id, cart_id) = {
            let mut guard = session.lock().await;
            let id = guard.submit(kind);
            (id, guard.cart_id().cloned())
        };
        debug!(mutation = %id, operation, "Submitted cart mutation");
        let mut in_flight = InFlightMutation::new(Arc::clone(&session), id);

        let response = send(cart_id).await;

        let mut guard = session.lock().await;
        in_flight.resolved();
        let result = match response {
            Ok(snapshot) => {
                let reconciled = guard.confirm(id, snapshot);
                debug!(mutation = %id, ?reconciled, "Cart mutation confirmed");
                Ok(reconciled)
            }
            Err(e) => {
                guard.fail(id);
                warn!(mutation = %id, operation, error = %e, "Cart mutation failed");
                Err(e)
            }
        };

        MutationOutcome {
            view: guard.view(),
            result,
        }
    }

    /// Number of tracked visitors (approximate until pending tasks run).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
