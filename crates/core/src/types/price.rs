//! Prices in synapses, the storefront's only currency.
//!
//! The catalog API reports prices as whole numbers, or `null` for
//! priceless items. `Price` only models the defined case; a product's
//! price is therefore an `Option<Price>`.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Serialize};

/// Display unit appended to every formatted price.
pub const CURRENCY_LABEL: &str = "synapses";

/// A whole-number amount of synapses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A price of nothing.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the raw amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Format for display (e.g., "750 synapses").
    #[must_use]
    pub fn display(self) -> String {
        format!("{} {CURRENCY_LABEL}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_prices() {
        let total: Price = [Price::new(750), Price::new(1450), Price::new(0)]
            .iter()
            .sum();
        assert_eq!(total, Price::new(2200));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = core::iter::empty::<Price>().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_display_with_label() {
        assert_eq!(Price::new(2500).display(), "2500 synapses");
    }

    #[test]
    fn test_optional_price_deserializes_null() {
        let price: Option<Price> = serde_json::from_str("null").unwrap();
        assert_eq!(price, None);
        let price: Option<Price> = serde_json::from_str("480").unwrap();
        assert_eq!(price, Some(Price::new(480)));
    }
}
