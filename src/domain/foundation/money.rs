//! Money value object backed by integer cents.
//!
//! All discount arithmetic happens in cents so repeated redemptions cannot
//! accumulate binary floating-point drift. Decimal amounts exist only at the
//! HTTP boundary, where DTOs convert through [`Money::from_major_units`] and
//! [`Money::as_major_units`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::ValidationError;

/// A non-negative currency amount in integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates a Money from integer cents.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `cents` is negative.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::negative_amount("amount", cents));
        }
        Ok(Self(cents))
    }

    /// Creates a Money from a decimal major-unit amount (e.g. `49.99`).
    ///
    /// Rounds half-up to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the amount is negative or not finite.
    pub fn from_major_units(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format("amount", "must be a finite number"));
        }
        if amount < 0.0 {
            return Err(ValidationError::negative_amount("amount", (amount * 100.0) as i64));
        }
        // f64::round is half-away-from-zero, which equals half-up for the
        // non-negative amounts allowed here.
        Ok(Self((amount * 100.0).round() as i64))
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the amount in major units for boundary serialization.
    pub fn as_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the smaller of two amounts.
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    /// Computes `self × basis_points / 10_000`, rounding half-up to the cent.
    ///
    /// Used for percentage discounts; basis points keep fractional
    /// percentages (e.g. 12.5% = 1250 bp) exact.
    pub fn percent_of_basis_points(&self, basis_points: u32) -> Money {
        let product = self.0 as i128 * basis_points as i128;
        Money(((product + 5_000) / 10_000) as i64)
    }

    /// Subtracts, saturating at zero.
    ///
    /// Discounts are clamped before subtraction, so saturation only guards
    /// against misuse; a final amount can never go negative.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_cents_rejects_negative() {
        assert!(Money::from_cents(-1).is_err());
        assert!(Money::from_cents(0).is_ok());
    }

    #[test]
    fn from_major_units_rounds_half_up() {
        assert_eq!(Money::from_major_units(10.005).unwrap().cents(), 1001);
        assert_eq!(Money::from_major_units(10.004).unwrap().cents(), 1000);
        assert_eq!(Money::from_major_units(49.99).unwrap().cents(), 4999);
    }

    #[test]
    fn from_major_units_rejects_nan_and_negative() {
        assert!(Money::from_major_units(f64::NAN).is_err());
        assert!(Money::from_major_units(f64::INFINITY).is_err());
        assert!(Money::from_major_units(-0.01).is_err());
    }

    #[test]
    fn percent_of_basis_points_rounds_half_up() {
        // 20% of 100.00 = 20.00
        let amount = Money::from_cents(10_000).unwrap();
        assert_eq!(amount.percent_of_basis_points(2_000).cents(), 2_000);

        // 12.5% of 0.33 = 0.04125 -> 0.04
        let small = Money::from_cents(33).unwrap();
        assert_eq!(small.percent_of_basis_points(1_250).cents(), 4);

        // 50% of 0.01 = 0.005 -> rounds up to 0.01
        let cent = Money::from_cents(1).unwrap();
        assert_eq!(cent.percent_of_basis_points(5_000).cents(), 1);
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let a = Money::from_cents(100).unwrap();
        let b = Money::from_cents(250).unwrap();
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a).cents(), 150);
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::from_cents(4999).unwrap().to_string(), "49.99");
        assert_eq!(Money::from_cents(5).unwrap().to_string(), "0.05");
    }

    proptest! {
        #[test]
        fn percentage_never_exceeds_amount(cents in 0i64..1_000_000_000, bp in 0u32..=10_000) {
            let amount = Money::from_cents(cents).unwrap();
            let cut = amount.percent_of_basis_points(bp);
            prop_assert!(cut <= amount);
        }

        #[test]
        fn major_unit_roundtrip_is_exact(cents in 0i64..1_000_000_000) {
            let amount = Money::from_cents(cents).unwrap();
            let back = Money::from_major_units(amount.as_major_units()).unwrap();
            prop_assert_eq!(amount, back);
        }
    }
}
