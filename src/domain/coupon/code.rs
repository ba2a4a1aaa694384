//! Coupon code value object.
//!
//! # Validation Rules
//!
//! - 4-20 characters
//! - Alphanumeric only
//! - Normalized to uppercase on construction

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

const MIN_LEN: usize = 4;
const MAX_LEN: usize = 20;

/// A validated, uppercase coupon code.
///
/// Lookups normalize through this type, so "save10" and "SAVE10" resolve to
/// the same coupon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    /// Creates a new CouponCode from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - Code is empty
    /// - Code is shorter than 4 or longer than 20 characters
    /// - Code contains non-alphanumeric characters
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("coupon_code"));
        }

        let normalized = trimmed.to_uppercase();

        if normalized.len() < MIN_LEN || normalized.len() > MAX_LEN {
            return Err(ValidationError::out_of_range(
                "coupon_code_length",
                MIN_LEN as i64,
                MAX_LEN as i64,
                normalized.len() as i64,
            ));
        }

        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "coupon_code",
                "alphanumeric characters only",
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CouponCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for CouponCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}
