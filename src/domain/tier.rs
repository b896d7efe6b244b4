//! Pricing tiers and the tier-selection rule.
//!
//! A product's discount schedule is an ordered list of tiers, each pairing
//! a quantity threshold with a unit price in integer paise. Tiers are
//! authored out-of-band and immutable here; this module only decides which
//! tier a given aggregate quantity earns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::TierId;

/// One step of a product's discount schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Tier identifier.
    pub id: TierId,
    /// Product this tier prices.
    pub product_id: Uuid,
    /// Minimum aggregate quantity at which this tier becomes eligible.
    pub threshold_quantity: i64,
    /// Unit price in paise while this tier is applied.
    pub unit_price_paise: i64,
    /// Tie-breaker among tiers with equal thresholds.
    pub sort_order: i32,
}

impl PricingTier {
    /// Whether this tier is eligible at the given aggregate quantity.
    #[must_use]
    pub const fn eligible_at(&self, total_quantity: i64) -> bool {
        total_quantity >= self.threshold_quantity
    }
}

/// Selects the tier a pool earns at `total_quantity`.
///
/// `tiers` must already be sorted ascending by `(threshold_quantity,
/// sort_order)`, which is how the store returns them. The winner is the
/// highest-threshold eligible tier; walking ascending and overwriting the
/// candidate while eligible means a threshold tie resolves to the later
/// tier in sort order.
///
/// Returns `None` when no tier is eligible, which only happens for a
/// schedule without a baseline (zero-threshold) tier.
#[must_use]
pub fn select_tier(tiers: &[PricingTier], total_quantity: i64) -> Option<&PricingTier> {
    let mut best = None;
    for tier in tiers {
        if tier.eligible_at(total_quantity) {
            best = Some(tier);
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tier(threshold: i64, price: i64, sort_order: i32) -> PricingTier {
        PricingTier {
            id: TierId::from_uuid(Uuid::new_v4()),
            product_id: Uuid::nil(),
            threshold_quantity: threshold,
            unit_price_paise: price,
            sort_order,
        }
    }

    fn schedule() -> Vec<PricingTier> {
        vec![tier(0, 5000, 0), tier(1000, 4700, 1), tier(5000, 4400, 2)]
    }

    #[test]
    fn below_first_discount_selects_baseline() {
        let tiers = schedule();
        let Some(selected) = select_tier(&tiers, 999) else {
            panic!("baseline tier expected");
        };
        assert_eq!(selected.threshold_quantity, 0);
        assert_eq!(selected.unit_price_paise, 5000);
    }

    #[test]
    fn exact_threshold_is_eligible() {
        let tiers = schedule();
        let Some(selected) = select_tier(&tiers, 1000) else {
            panic!("tier expected");
        };
        assert_eq!(selected.threshold_quantity, 1000);
        assert_eq!(selected.unit_price_paise, 4700);
    }

    #[test]
    fn highest_eligible_threshold_wins() {
        let tiers = schedule();
        let Some(selected) = select_tier(&tiers, 5000) else {
            panic!("tier expected");
        };
        assert_eq!(selected.threshold_quantity, 5000);
        assert_eq!(selected.unit_price_paise, 4400);

        let Some(selected) = select_tier(&tiers, 1_000_000) else {
            panic!("tier expected");
        };
        assert_eq!(selected.threshold_quantity, 5000);
    }

    #[test]
    fn selection_is_monotonic_in_quantity() {
        let tiers = schedule();
        let mut last_threshold = -1;
        for q in [0, 1, 999, 1000, 1001, 4999, 5000, 9999] {
            let Some(selected) = select_tier(&tiers, q) else {
                panic!("tier expected at {q}");
            };
            assert!(selected.threshold_quantity >= last_threshold);
            last_threshold = selected.threshold_quantity;
        }
    }

    #[test]
    fn no_baseline_tier_yields_none() {
        let tiers = vec![tier(1000, 4700, 0)];
        assert!(select_tier(&tiers, 999).is_none());
        assert!(select_tier(&tiers, 1000).is_some());
    }

    #[test]
    fn empty_schedule_yields_none() {
        assert!(select_tier(&[], 100).is_none());
    }

    #[test]
    fn threshold_tie_breaks_by_sort_order() {
        // Same threshold, later sort order wins because the store sorts
        // by (threshold, sort_order) ascending and the walk overwrites.
        let tiers = vec![tier(0, 5000, 0), tier(100, 4800, 1), tier(100, 4750, 2)];
        let Some(selected) = select_tier(&tiers, 100) else {
            panic!("tier expected");
        };
        assert_eq!(selected.sort_order, 2);
        assert_eq!(selected.unit_price_paise, 4750);
    }
}
