//! Per-visitor pending/confirmed cart state.

use super::{CartSnapshot, MutationId, MutationKind, OptimisticCartView, PendingMutation, apply_pending};
use crate::types::CartId;

/// Outcome of reconciling a mutation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The response's cart became the current snapshot.
    Applied,
    /// A later mutation already produced the current snapshot; the response
    /// cart was dropped.
    Superseded,
    /// No such pending mutation (already resolved, or never submitted).
    Unknown,
}

/// The last confirmed cart plus every mutation still in flight.
///
/// Written only by mutation submission and response handling; everything
/// else reads [`CartSession::view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSession {
    snapshot: Option<CartSnapshot>,
    /// Mutation whose response produced `snapshot`; `None` for a fetched cart.
    snapshot_seq: Option<MutationId>,
    pending: Vec<PendingMutation>,
    next_seq: u64,
}

impl CartSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshot: None,
            snapshot_seq: None,
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Session seeded with a cart fetched from the server.
    #[must_use]
    pub fn with_snapshot(snapshot: CartSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Self::new()
        }
    }

    /// Queue a mutation and return its submission ID.
    pub fn submit(&mut self, kind: MutationKind) -> MutationId {
        self.next_seq += 1;
        let id = MutationId::new(self.next_seq);
        self.pending.push(PendingMutation::new(id, kind));
        id
    }

    /// Resolve a mutation with the cart the server returned for it.
    ///
    /// The mutation leaves the pending set either way. Its cart replaces the
    /// snapshot unless a later-submitted mutation's cart is already in place,
    /// so responses arriving out of order never roll the cart backwards.
    pub fn confirm(&mut self, id: MutationId, snapshot: CartSnapshot) -> Reconciled {
        if !self.take(id) {
            return Reconciled::Unknown;
        }
        if self.snapshot_seq.is_some_and(|current| current > id) {
            return Reconciled::Superseded;
        }
        self.snapshot = Some(snapshot);
        self.snapshot_seq = Some(id);
        Reconciled::Applied
    }

    /// Drop a mutation the server rejected.
    ///
    /// The view reverts to the snapshot with the remaining mutations folded
    /// in. Returns `false` if the mutation wasn't pending.
    pub fn fail(&mut self, id: MutationId) -> bool {
        self.take(id)
    }

    /// Replace the snapshot with a freshly fetched cart.
    ///
    /// Ignored while mutations are in flight, since their responses carry
    /// newer state. Returns whether the snapshot was replaced.
    pub fn refresh(&mut self, snapshot: CartSnapshot) -> bool {
        if !self.pending.is_empty() {
            return false;
        }
        self.snapshot = Some(snapshot);
        true
    }

    /// Forget the cart (e.g., the server no longer knows its ID).
    pub fn reset(&mut self) {
        *self = Self {
            next_seq: self.next_seq,
            ..Self::new()
        };
    }

    /// The cart the shopper should see now.
    ///
    /// Only mutations submitted after the one that produced the snapshot are
    /// folded in. Older ones still in flight are already reflected in (or
    /// overwritten by) the snapshot's server state.
    #[must_use]
    pub fn view(&self) -> OptimisticCartView {
        let newer: Vec<PendingMutation> = self
            .pending
            .iter()
            .filter(|m| self.snapshot_seq.is_none_or(|seq| m.id > seq))
            .cloned()
            .collect();
        apply_pending(self.snapshot.as_ref(), &newer)
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<&CartSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn pending(&self) -> &[PendingMutation] {
        &self.pending
    }

    #[must_use]
    pub fn cart_id(&self) -> Option<&CartId> {
        self.snapshot.as_ref().map(|s| &s.id)
    }

    /// Nothing in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    fn take(&mut self, id: MutationId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|m| m.id != id);
        self.pending.len() != before
    }
}
