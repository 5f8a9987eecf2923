//! Money as integer minor units (paise).
//!
//! Amounts are stored as whole paise so that arithmetic and equality never
//! drift the way binary floating point does. Floats only appear at the wire
//! boundary, where amounts travel as decimal rupees.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Monetary amount in paise (1/100 rupee). Always non-negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paise(u64);

/// Largest major-unit value that still converts to paise without losing
/// integer precision in an `f64` (2^53 paise).
const MAX_MAJOR: f64 = (1u64 << 53) as f64 / 100.0;

impl Paise {
    pub const ZERO: Paise = Paise(0);

    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Convert a major-unit (rupee) amount to paise.
    ///
    /// Rounds to the nearest paisa, ties away from zero (`f64::round`).
    /// Rejects non-finite, negative, and out-of-range input rather than
    /// panicking; callers upstream should have validated already, but the
    /// store must stay safe against raw numeric input.
    pub fn from_major(major: f64) -> DomainResult<Self> {
        if !major.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if major < 0.0 {
            return Err(DomainError::validation("amount must be non-negative"));
        }
        if major > MAX_MAJOR {
            return Err(DomainError::validation("amount is too large"));
        }
        Ok(Self((major * 100.0).round() as u64))
    }

    /// Convert back to a major-unit (rupee) amount for the wire.
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn as_minor(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for Paise {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn converts_rupees_to_paise() {
        assert_eq!(Paise::from_major(12.50).unwrap(), Paise::from_minor(1250));
        assert_eq!(Paise::from_major(0.10).unwrap(), Paise::from_minor(10));
        assert_eq!(Paise::from_major(0.0).unwrap(), Paise::ZERO);
    }

    #[test]
    fn rounds_to_nearest_paisa() {
        // 0.1 + 0.2 style float residue must not leak into storage.
        assert_eq!(Paise::from_major(0.30000000000000004).unwrap(), Paise::from_minor(30));
        // Ties round away from zero.
        assert_eq!(Paise::from_major(0.005).unwrap(), Paise::from_minor(1));
    }

    #[test]
    fn displays_as_decimal_rupees() {
        assert_eq!(Paise::from_minor(1250).to_string(), "12.50");
        assert_eq!(Paise::from_minor(5).to_string(), "0.05");
        assert_eq!(Paise::ZERO.to_string(), "0.00");
    }

    #[test]
    fn rejects_bad_numeric_input() {
        assert!(Paise::from_major(-1.0).is_err());
        assert!(Paise::from_major(f64::NAN).is_err());
        assert!(Paise::from_major(f64::INFINITY).is_err());
        assert!(Paise::from_major(1e18).is_err());
    }

    proptest! {
        /// Property: any amount with at most two fractional digits survives
        /// the major -> minor -> major round trip exactly.
        #[test]
        fn major_minor_round_trip(minor in 0u64..1_000_000_000_000u64) {
            let paise = Paise::from_minor(minor);
            let back = Paise::from_major(paise.to_major()).unwrap();
            prop_assert_eq!(back, paise);
        }
    }
}
