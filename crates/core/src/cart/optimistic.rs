//! Folding pending mutations into a cart snapshot.

use serde::Serialize;

use super::{CartLine, CartSnapshot, DiscountCode, Merchandise, MutationKind, PendingMutation};
use crate::types::{CartId, CartLineId, Money};

/// Prefix of line IDs materialised from unconfirmed adds.
pub const OPTIMISTIC_LINE_PREFIX: &str = "optimistic-line-";

/// A cart line as the shopper should see it right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimisticLine {
    pub id: CartLineId,
    pub merchandise: Merchandise,
    pub quantity: u32,
    pub cost: Money,
    /// The line (or its latest quantity) is not yet confirmed by the server.
    pub is_optimistic: bool,
}

impl From<&CartLine> for OptimisticLine {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            merchandise: line.merchandise.clone(),
            quantity: line.quantity,
            cost: line.cost,
            is_optimistic: false,
        }
    }
}

/// Quantity controls for one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineControls {
    /// Quantity the decrement button submits.
    pub decrease_to: u32,
    /// Quantity the increment button submits.
    pub increase_to: u32,
    pub can_decrease: bool,
    pub can_increase: bool,
    pub can_remove: bool,
}

impl OptimisticLine {
    /// Controls are locked while the line is unconfirmed, since its ID may
    /// not exist server-side yet. Decrementing stops at one; removal is a
    /// separate action.
    #[must_use]
    pub const fn controls(&self) -> LineControls {
        LineControls {
            decrease_to: self.quantity.saturating_sub(1),
            increase_to: self.quantity.saturating_add(1),
            can_decrease: self.quantity > 1 && !self.is_optimistic,
            can_increase: !self.is_optimistic,
            can_remove: !self.is_optimistic,
        }
    }
}

/// A cart snapshot with every pending mutation applied.
///
/// Never stored; recomputed from the snapshot and pending set on each
/// render. With nothing pending it equals the snapshot exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimisticCartView {
    /// `None` until the first add has been confirmed and a cart exists.
    pub id: Option<CartId>,
    pub checkout_url: Option<String>,
    pub lines: Vec<OptimisticLine>,
    pub total_quantity: u32,
    /// Server subtotal, or an estimate from line costs while mutations are
    /// pending. `None` for a cart that has never existed.
    pub subtotal: Option<Money>,
    pub discount_codes: Vec<DiscountCode>,
}

impl From<&CartSnapshot> for OptimisticCartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            id: Some(snapshot.id.clone()),
            checkout_url: Some(snapshot.checkout_url.clone()),
            lines: snapshot.lines.iter().map(OptimisticLine::from).collect(),
            total_quantity: snapshot.total_quantity,
            subtotal: Some(snapshot.subtotal),
            discount_codes: snapshot.discount_codes.clone(),
        }
    }
}

impl OptimisticCartView {
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_codes.iter().any(|d| d.applicable)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, id: &CartLineId) -> Option<&OptimisticLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Whether any line is still waiting on the server.
    #[must_use]
    pub fn has_optimistic_lines(&self) -> bool {
        self.lines.iter().any(|l| l.is_optimistic)
    }

    fn apply(&mut self, mutation: &PendingMutation) {
        match &mutation.kind {
            MutationKind::Add {
                merchandise,
                quantity,
            } => {
                if *quantity == 0 {
                    return;
                }
                if let Some(line) = self
                    .lines
                    .iter_mut()
                    .find(|l| l.merchandise.id == merchandise.id)
                {
                    line.quantity = line.quantity.saturating_add(*quantity);
                    line.cost = line.merchandise.price.times(line.quantity);
                    line.is_optimistic = true;
                } else {
                    self.lines.push(OptimisticLine {
                        id: CartLineId::new(format!(
                            "{OPTIMISTIC_LINE_PREFIX}{}",
                            mutation.id.sequence()
                        )),
                        merchandise: merchandise.clone(),
                        quantity: *quantity,
                        cost: merchandise.price.times(*quantity),
                        is_optimistic: true,
                    });
                }
            }
            MutationKind::UpdateQuantity { line_id, quantity } => {
                if *quantity <= 0 {
                    self.lines.retain(|l| &l.id != line_id);
                    return;
                }
                let Some(line) = self.lines.iter_mut().find(|l| &l.id == line_id) else {
                    return;
                };
                line.quantity = u32::try_from(*quantity).unwrap_or(u32::MAX);
                line.cost = line.merchandise.price.times(line.quantity);
            }
            MutationKind::Remove { line_id } => {
                self.lines.retain(|l| &l.id != line_id);
            }
        }
    }
}

/// Compute the view the shopper should see.
///
/// `snapshot` is the last confirmed cart (`None` when no cart exists yet).
/// `pending` may be in any order; mutations are folded by submission
/// sequence. A mutation whose target line is absent is skipped.
#[must_use]
pub fn apply_pending(
    snapshot: Option<&CartSnapshot>,
    pending: &[PendingMutation],
) -> OptimisticCartView {
    let mut view = snapshot.map(OptimisticCartView::from).unwrap_or_default();
    if pending.is_empty() {
        return view;
    }

    let mut ordered: Vec<&PendingMutation> = pending.iter().collect();
    ordered.sort_by_key(|m| m.id);
    for mutation in ordered {
        view.apply(mutation);
    }

    let currency = view.subtotal.map(|s| s.currency_code);
    view.total_quantity = view.lines.iter().map(|l| l.quantity).sum();
    view.subtotal = view
        .lines
        .iter()
        .map(|l| l.cost)
        .reduce(Money::plus)
        .or_else(|| currency.map(Money::zero));
    view
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::MutationId;
    use super::super::fixtures::*;
    use super::*;

    fn pending(seq: u64, kind: MutationKind) -> PendingMutation {
        PendingMutation::new(MutationId::new(seq), kind)
    }

    fn l1() -> CartLineId {
        CartLineId::new("gid://shopify/CartLine/L1")
    }

    #[test]
    fn test_no_pending_equals_snapshot() {
        let cart = snapshot(vec![line("L1", merchandise("S", 2500), 2)]);
        let view = apply_pending(Some(&cart), &[]);
        assert_eq!(view, OptimisticCartView::from(&cart));
        assert_eq!(view.total_quantity, 2);
        assert_eq!(view.subtotal, Some(cart.subtotal));
        assert!(!view.has_optimistic_lines());

        assert_eq!(apply_pending(None, &[]), OptimisticCartView::default());
    }

    #[test]
    fn test_update_quantity_sets_line() {
        let cart = snapshot(vec![line("L1", merchandise("S", 2500), 2)]);
        let view = apply_pending(
            Some(&cart),
            &[pending(
                1,
                MutationKind::UpdateQuantity {
                    line_id: l1(),
                    quantity: 3,
                },
            )],
        );
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 3);
        assert_eq!(view.total_quantity, 3);
        assert_eq!(view.lines[0].cost, usd(7500));
        assert!(!view.lines[0].is_optimistic);
    }

    #[test]
    fn test_add_to_empty_cart_is_optimistic() {
        let view = apply_pending(
            None,
            &[pending(
                1,
                MutationKind::Add {
                    merchandise: merchandise("S", 2500),
                    quantity: 1,
                },
            )],
        );
        assert_eq!(view.lines.len(), 1);
        assert!(view.lines[0].is_optimistic);
        assert_eq!(view.lines[0].id.as_str(), "optimistic-line-1");
        assert_eq!(view.total_quantity, 1);
        assert_eq!(view.subtotal, Some(usd(2500)));
        assert_eq!(view.id, None);
    }

    #[test]
    fn test_adds_of_same_merchandise_merge() {
        let tee = merchandise("S", 2500);
        let view = apply_pending(
            None,
            &[
                pending(
                    1,
                    MutationKind::Add {
                        merchandise: tee.clone(),
                        quantity: 2,
                    },
                ),
                pending(
                    2,
                    MutationKind::Add {
                        merchandise: tee,
                        quantity: 3,
                    },
                ),
            ],
        );
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 5);
        assert_eq!(view.total_quantity, 5);
    }

    #[test]
    fn test_add_to_confirmed_line_marks_it_pending() {
        let tee = merchandise("S", 2500);
        let cart = snapshot(vec![line("L1", tee.clone(), 1)]);
        let view = apply_pending(
            Some(&cart),
            &[pending(
                1,
                MutationKind::Add {
                    merchandise: tee,
                    quantity: 1,
                },
            )],
        );
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].id, l1());
        assert_eq!(view.lines[0].quantity, 2);
        assert!(view.lines[0].is_optimistic);
    }

    #[test]
    fn test_update_to_zero_or_negative_removes() {
        let cart = snapshot(vec![
            line("L1", merchandise("S", 2500), 2),
            line("L2", merchandise("M", 2500), 1),
        ]);
        for quantity in [0, -4] {
            let view = apply_pending(
                Some(&cart),
                &[pending(
                    1,
                    MutationKind::UpdateQuantity {
                        line_id: l1(),
                        quantity,
                    },
                )],
            );
            assert_eq!(view.lines.len(), 1);
            assert!(view.line(&l1()).is_none());
            assert_eq!(view.total_quantity, 1);
        }
    }

    #[test]
    fn test_submission_order_decides_update_vs_remove() {
        let cart = snapshot(vec![line("L1", merchandise("S", 2500), 2)]);
        let update = |seq| {
            pending(
                seq,
                MutationKind::UpdateQuantity {
                    line_id: l1(),
                    quantity: 5,
                },
            )
        };
        let remove = |seq| pending(seq, MutationKind::Remove { line_id: l1() });

        // Remove submitted last wins.
        let view = apply_pending(Some(&cart), &[update(1), remove(2)]);
        assert!(view.is_empty());

        // Update after a remove targets a missing line and is skipped.
        let view = apply_pending(Some(&cart), &[remove(1), update(2)]);
        assert!(view.is_empty());
        assert_eq!(view.total_quantity, 0);
        assert_eq!(view.subtotal, Some(usd(0)));
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let cart = snapshot(vec![line("L1", merchandise("S", 2500), 2)]);
        let first = pending(
            1,
            MutationKind::UpdateQuantity {
                line_id: l1(),
                quantity: 3,
            },
        );
        let second = pending(
            2,
            MutationKind::UpdateQuantity {
                line_id: l1(),
                quantity: 4,
            },
        );
        let forward = apply_pending(Some(&cart), &[first.clone(), second.clone()]);
        let reversed = apply_pending(Some(&cart), &[second, first]);
        assert_eq!(forward, reversed);
        assert_eq!(forward.lines[0].quantity, 4);
    }

    #[test]
    fn test_missing_line_is_ignored() {
        let cart = snapshot(vec![line("L1", merchandise("S", 2500), 2)]);
        let ghost = CartLineId::new("gid://shopify/CartLine/ghost");
        let view = apply_pending(
            Some(&cart),
            &[
                pending(
                    1,
                    MutationKind::UpdateQuantity {
                        line_id: ghost.clone(),
                        quantity: 9,
                    },
                ),
                pending(2, MutationKind::Remove { line_id: ghost }),
            ],
        );
        assert_eq!(view.lines, OptimisticCartView::from(&cart).lines);
        assert_eq!(view.total_quantity, 2);
    }

    #[test]
    fn test_line_controls() {
        let cart = snapshot(vec![line("L1", merchandise("S", 2500), 1)]);
        let view = apply_pending(Some(&cart), &[]);
        let controls = view.lines[0].controls();
        assert_eq!(controls.decrease_to, 0);
        assert_eq!(controls.increase_to, 2);
        assert!(!controls.can_decrease);
        assert!(controls.can_increase);
        assert!(controls.can_remove);

        let view = apply_pending(
            None,
            &[pending(
                1,
                MutationKind::Add {
                    merchandise: merchandise("S", 2500),
                    quantity: 3,
                },
            )],
        );
        let controls = view.lines[0].controls();
        assert!(!controls.can_decrease);
        assert!(!controls.can_increase);
        assert!(!controls.can_remove);
    }

    #[test]
    fn test_discount_flag_survives_folding() {
        let mut cart = snapshot(vec![line("L1", merchandise("S", 2500), 2)]);
        cart.discount_codes.push(DiscountCode {
            code: "WELCOME10".to_string(),
            applicable: true,
        });
        let view = apply_pending(Some(&cart), &[pending(1, MutationKind::Remove { line_id: l1() })]);
        assert!(view.has_discount());
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::super::MutationId;
    use super::super::fixtures::*;
    use super::*;

    fn line_ids() -> impl Strategy<Value = CartLineId> {
        prop_oneof![
            Just(CartLineId::new("gid://shopify/CartLine/L1")),
            Just(CartLineId::new("gid://shopify/CartLine/L2")),
            Just(CartLineId::new("gid://shopify/CartLine/missing")),
            Just(CartLineId::new("optimistic-line-1")),
        ]
    }

    fn kinds() -> impl Strategy<Value = MutationKind> {
        prop_oneof![
            (prop_oneof![Just("S"), Just("M"), Just("L")], 0u32..5).prop_map(
                |(size, quantity)| MutationKind::Add {
                    merchandise: merchandise(size, 2500),
                    quantity,
                }
            ),
            (line_ids(), -2i64..6).prop_map(|(line_id, quantity)| {
                MutationKind::UpdateQuantity { line_id, quantity }
            }),
            line_ids().prop_map(|line_id| MutationKind::Remove { line_id }),
        ]
    }

    fn base_cart() -> CartSnapshot {
        snapshot(vec![
            line("L1", merchandise("S", 2500), 2),
            line("L2", merchandise("M", 2500), 1),
        ])
    }

    proptest! {
        #[test]
        fn total_is_sum_of_line_quantities(kinds in prop::collection::vec(kinds(), 0..40)) {
            let pending: Vec<_> = kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| PendingMutation::new(MutationId::new(i as u64 + 1), kind))
                .collect();
            let view = apply_pending(Some(&base_cart()), &pending);
            prop_assert_eq!(view.total_quantity, view.lines.iter().map(|l| l.quantity).sum::<u32>());
            prop_assert!(view.lines.iter().all(|l| l.quantity > 0));
        }

        #[test]
        fn fold_ignores_input_order(
            kinds in prop::collection::vec(kinds(), 0..20),
            rotate in 0usize..20,
        ) {
            let pending: Vec<_> = kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| PendingMutation::new(MutationId::new(i as u64 + 1), kind))
                .collect();
            let mut shuffled = pending.clone();
            if !shuffled.is_empty() {
                let by = rotate % shuffled.len();
                shuffled.rotate_left(by);
                shuffled.reverse();
            }
            prop_assert_eq!(
                apply_pending(Some(&base_cart()), &pending),
                apply_pending(Some(&base_cart()), &shuffled)
            );
        }

        #[test]
        fn merchandise_appears_at_most_once(kinds in prop::collection::vec(kinds(), 0..40)) {
            let pending: Vec<_> = kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| PendingMutation::new(MutationId::new(i as u64 + 1), kind))
                .collect();
            let view = apply_pending(None, &pending);
            for (i, a) in view.lines.iter().enumerate() {
                for b in &view.lines[i + 1..] {
                    prop_assert_ne!(&a.merchandise.id, &b.merchandise.id);
                }
            }
        }
    }
}
