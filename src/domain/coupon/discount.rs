//! Discount configuration and computation.
//!
//! The discount is a closed sum type rather than a string-tagged document so
//! `compute` can match exhaustively; an unknown discount kind is a parse
//! error at the storage boundary, not a silent no-op at redemption time.

use crate::domain::foundation::{Money, ValidationError};
use serde::{Deserialize, Serialize};

/// Percentage discounts are stored in basis points (1% = 100 bp) so
/// fractional percentages stay exact in integer arithmetic.
pub const MAX_BASIS_POINTS: u32 = 10_000;

/// Discount configuration for a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Discount {
    /// Percentage of the purchase amount, optionally capped.
    Percentage {
        basis_points: u32,
        cap: Option<Money>,
    },
    /// Fixed amount off, clamped to the purchase amount.
    Fixed { amount: Money },
}

impl Discount {
    /// Creates a percentage discount from basis points.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `basis_points` exceeds 100%.
    pub fn percentage(basis_points: u32, cap: Option<Money>) -> Result<Self, ValidationError> {
        if basis_points > MAX_BASIS_POINTS {
            return Err(ValidationError::out_of_range(
                "discount_basis_points",
                0,
                MAX_BASIS_POINTS as i64,
                basis_points as i64,
            ));
        }
        Ok(Discount::Percentage { basis_points, cap })
    }

    /// Creates a fixed-amount discount.
    pub fn fixed(amount: Money) -> Self {
        Discount::Fixed { amount }
    }

    /// Computes the discount for a purchase amount.
    ///
    /// The result is always within `[0, purchase]`: percentage discounts are
    /// clamped to their cap, fixed discounts to the purchase amount, so a
    /// final amount can never go negative.
    pub fn compute(&self, purchase: Money) -> Money {
        match *self {
            Discount::Percentage { basis_points, cap } => {
                let discount = purchase.percent_of_basis_points(basis_points);
                match cap {
                    Some(cap) => discount.min(cap).min(purchase),
                    None => discount.min(purchase),
                }
            }
            Discount::Fixed { amount } => amount.min(purchase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn money(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    #[test]
    fn percentage_rejects_over_100() {
        assert!(Discount::percentage(10_001, None).is_err());
        assert!(Discount::percentage(10_000, None).is_ok());
    }

    #[test]
    fn percentage_computes_share_of_purchase() {
        let discount = Discount::percentage(2_000, None).unwrap();
        assert_eq!(discount.compute(money(10_000)), money(2_000));
    }

    #[test]
    fn percentage_cap_limits_discount() {
        // 20% of 100.00 would be 20.00; cap of 10.00 wins.
        let discount = Discount::percentage(2_000, Some(money(1_000))).unwrap();
        assert_eq!(discount.compute(money(10_000)), money(1_000));
    }

    #[test]
    fn percentage_below_cap_is_untouched() {
        let discount = Discount::percentage(2_000, Some(money(1_000))).unwrap();
        assert_eq!(discount.compute(money(2_000)), money(400));
    }

    #[test]
    fn fixed_discount_applies_in_full() {
        let discount = Discount::fixed(money(1_000));
        assert_eq!(discount.compute(money(5_000)), money(1_000));
    }

    #[test]
    fn fixed_discount_clamps_to_purchase() {
        // A 10.00-off coupon on a 6.00 order discounts 6.00, never more.
        let discount = Discount::fixed(money(1_000));
        assert_eq!(discount.compute(money(600)), money(600));
    }

    #[test]
    fn zero_purchase_yields_zero_discount() {
        assert_eq!(Discount::fixed(money(500)).compute(Money::ZERO), Money::ZERO);
        let pct = Discount::percentage(5_000, None).unwrap();
        assert_eq!(pct.compute(Money::ZERO), Money::ZERO);
    }

    #[test]
    fn serializes_with_type_tag() {
        let discount = Discount::fixed(money(1_000));
        let json = serde_json::to_value(&discount).unwrap();
        assert_eq!(json["type"], "fixed");
        assert_eq!(json["amount"], 1_000);
    }

    proptest! {
        #[test]
        fn discount_is_always_within_bounds(
            purchase in 0i64..1_000_000_000,
            bp in 0u32..=10_000,
            cap in proptest::option::of(0i64..1_000_000),
            fixed in 0i64..1_000_000,
        ) {
            let purchase = money(purchase);
            let cap = cap.map(money);

            let pct = Discount::percentage(bp, cap).unwrap();
            let d = pct.compute(purchase);
            prop_assert!(Money::ZERO <= d && d <= purchase);

            let fix = Discount::fixed(money(fixed));
            let d = fix.compute(purchase);
            prop_assert!(Money::ZERO <= d && d <= purchase);
        }
    }
}
