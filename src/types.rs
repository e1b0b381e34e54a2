// -------------------------------------------------------------------------------------------------
//  Fixed-precision price and quantity value types.
//
//  Both are backed by an `i64` raw value scaled by `10^precision`, following the fixed-point
//  convention used upstream for the domain's price/quantity types. Comparisons and arithmetic
//  operate on the raw integer so two values are only ever compared when they share a precision
//  (true for every price/quantity pair that flows through a single matching core, since both are
//  quantized to the instrument's `price_increment`).
// -------------------------------------------------------------------------------------------------

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

const MAX_PRECISION: u8 = 9;

fn pow10(precision: u8) -> f64 {
    10f64.powi(i32::from(precision))
}

/// A fixed-precision price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    pub raw: i64,
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] from a floating-point value, quantized to `precision`.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds the maximum supported precision.
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        assert!(precision <= MAX_PRECISION, "precision out of range");
        let raw = (value * pow10(precision)).round() as i64;
        Self { raw, precision }
    }

    /// Creates a [`Price`] directly from a pre-scaled raw value.
    #[must_use]
    pub const fn from_raw(raw: i64, precision: u8) -> Self {
        Self { raw, precision }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.raw as f64 / pow10(self.precision)
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        let precision = value.split('.').nth(1).map_or(0, |frac| frac.len() as u8);
        Self::new(value.parse().expect("invalid price literal"), precision)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

/// A fixed-precision quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity {
    pub raw: i64,
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] from a floating-point value, quantized to `precision`.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds the maximum supported precision.
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        assert!(precision <= MAX_PRECISION, "precision out of range");
        let raw = (value * pow10(precision)).round() as i64;
        Self { raw, precision }
    }

    #[must_use]
    pub const fn zero(precision: u8) -> Self {
        Self { raw: 0, precision }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.raw as f64 / pow10(self.precision)
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        let precision = value.split('.').nth(1).map_or(0, |frac| frac.len() as u8);
        Self::new(value.parse().expect("invalid quantity literal"), precision)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self::new(value as f64, 0)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

use crate::identifiers::InstrumentId;

/// A top-of-book quote: the best bid and ask currently available for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTick {
    pub instrument_id: InstrumentId,
    pub bid_price: Price,
    pub ask_price: Price,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// A single executed trade print for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTick {
    pub instrument_id: InstrumentId,
    pub price: Price,
    pub size: Quantity,
    pub ts_event: u64,
    pub ts_init: u64,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("100.00", 100.0)]
    #[case("0.01", 0.01)]
    #[case("5070.00", 5070.0)]
    fn price_from_str_round_trips(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(Price::from(text).as_f64(), expected);
    }

    #[test]
    fn price_ordering_is_raw_comparison() {
        let a = Price::new(100.00, 2);
        let b = Price::new(101.00, 2);
        assert!(a < b);
        assert!(b > a);
        assert_eq!(Price::new(100.00, 2), Price::new(100.00, 2));
    }

    #[test]
    fn quantity_zero_is_zero() {
        assert!(Quantity::zero(0).is_zero());
        assert!(!Quantity::from(1).is_zero());
    }
}
