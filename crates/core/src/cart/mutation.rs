//! Locally queued cart changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Merchandise;
use crate::types::CartLineId;

/// Submission sequence number of a pending mutation.
///
/// Issued in increasing order by [`super::CartSession::submit`]; folding and
/// reconciliation order by this, never by response arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(u64);

impl MutationId {
    #[must_use]
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// What a mutation does to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MutationKind {
    /// Add merchandise, merging into an existing line for the same variant.
    Add {
        merchandise: Merchandise,
        quantity: u32,
    },
    /// Set a line's quantity. Zero or less removes the line.
    UpdateQuantity { line_id: CartLineId, quantity: i64 },
    /// Delete a line regardless of quantity.
    Remove { line_id: CartLineId },
}

impl MutationKind {
    /// The line this mutation targets; `None` for adds.
    #[must_use]
    pub fn target_line(&self) -> Option<&CartLineId> {
        match self {
            Self::Add { .. } => None,
            Self::UpdateQuantity { line_id, .. } | Self::Remove { line_id } => Some(line_id),
        }
    }

    /// Storefront API operation name, for logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Add { .. } => "LinesAdd",
            Self::UpdateQuantity { .. } => "LinesUpdate",
            Self::Remove { .. } => "LinesRemove",
        }
    }
}

/// A submitted, unanswered mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMutation {
    pub id: MutationId,
    pub kind: MutationKind,
}

impl PendingMutation {
    #[must_use]
    pub const fn new(id: MutationId, kind: MutationKind) -> Self {
        Self { id, kind }
    }

    #[must_use]
    pub fn target_line(&self) -> Option<&CartLineId> {
        self.kind.target_line()
    }
}
