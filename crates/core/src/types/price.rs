//! Type-safe price representation.
//!
//! Prices are whole rupees (integer currency units); the payment gateway
//! wants paise, so [`Price::to_minor_units`] multiplies by 100.

use serde::{Deserialize, Serialize};

/// A price in whole rupees.
///
/// Product prices and order totals are stored in the document store as
/// plain integers, so this is a transparent wrapper rather than a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a new price from whole rupees.
    #[must_use]
    pub const fn new(rupees: i64) -> Self {
        Self(rupees)
    }

    /// Get the amount in whole rupees.
    #[must_use]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Convert to paise for the payment gateway.
    #[must_use]
    pub const fn to_minor_units(&self) -> i64 {
        self.0 * 100
    }

    /// Multiply the unit price by an order quantity.
    #[must_use]
    pub const fn times(&self, quantity: i64) -> Self {
        Self(self.0 * quantity)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(rupees: i64) -> Self {
        Self(rupees)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(Price::new(120).to_minor_units(), 12_000);
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::new(100).times(3), Price::new(300));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(45).to_string(), "₹45");
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::new(250);
        assert_eq!(serde_json::to_string(&price).unwrap(), "250");
        assert_eq!(serde_json::from_str::<Price>("250").unwrap(), price);
    }
}
