//! Type-safe price representation using decimal arithmetic.
//!
//! All prices are in the spa's single base currency (Nigerian naira); there
//! is no multi-currency support.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::format_currency;

/// A unit price in the base currency.
///
/// Deserializes from either a JSON number or a numeric string, since the API
/// sends both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of naira.
    #[must_use]
    pub fn from_naira(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `₦25,000`.
    #[must_use]
    pub fn display(&self) -> String {
        format_currency(self.0, false)
    }

    /// Format without the currency glyph, e.g. `25,000`.
    #[must_use]
    pub fn display_plain(&self) -> String {
        format_currency(self.0, true)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from_number_and_string() {
        let a: Price = serde_json::from_str("15000").unwrap();
        let b: Price = serde_json::from_str("\"15000.00\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_price_sum_empty_is_zero() {
        let total: Price = Vec::<Price>::new().into_iter().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_naira(25_000).to_string(), "₦25,000");
        assert_eq!(Price::from_naira(25_000).display_plain(), "25,000");
    }

    #[test]
    fn test_price_mul() {
        assert_eq!(Price::from_naira(1_500) * 3, Price::from_naira(4_500));
    }
}
