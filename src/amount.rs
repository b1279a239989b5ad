//! Fixed-point monetary amount with 4 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that balances
//! accumulate exactly and never drift the way binary floats do.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A signed amount of money kept at exactly 4 decimal places.
///
/// Internal arithmetic is exact. Rounding happens only when the amount is
/// shown to a person, see [`Amount::display_rounded`].
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use fairsplit::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
/// assert_eq!(amount.display_rounded(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 4;

    /// Number of decimal places used when rendering for people.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Tolerance below which a residual is treated as zero (0.005).
    pub const EPSILON: Self = Amount(Decimal::from_parts(50, 0, 0, false, 4));

    /// Creates a new `Amount` from a `Decimal`, normalizing to 4 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Creates an amount from a count of the smallest representable unit (0.0001).
    pub fn from_units(units: i128) -> Self {
        Amount(Decimal::from_i128_with_scale(units, Self::SCALE))
    }

    /// Number of 0.0001 units in this amount.
    pub fn units(&self) -> i128 {
        let mut value = self.0;
        value.rescale(Self::SCALE);
        value.mantissa()
    }

    /// Returns `true` if this value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns `true` if the magnitude is below [`Amount::EPSILON`].
    ///
    /// This is the one tolerance check used by both the ledger and the
    /// settlement planner.
    pub fn is_negligible(&self) -> bool {
        self.abs() < Self::EPSILON
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Splits this amount into `parts` shares that sum back to it exactly.
    ///
    /// Every share gets the same number of units; the leftover units go one
    /// each to the leading shares. Returns an empty vector when `parts` is zero.
    pub fn split(&self, parts: usize) -> Vec<Amount> {
        if parts == 0 {
            return Vec::new();
        }

        let units = self.units();
        let divisor = parts as i128;
        let base = units.div_euclid(divisor);
        let leftover = units.rem_euclid(divisor) as usize;

        (0..parts)
            .map(|idx| {
                if idx < leftover {
                    Amount::from_units(base + 1)
                } else {
                    Amount::from_units(base)
                }
            })
            .collect()
    }

    /// Formats the amount to two decimals using round-half-even.
    pub fn display_rounded(&self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(Self::DISPLAY_SCALE);
        rounded.to_string()
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    /// Accepts plain decimals and exponent notation such as `1e2`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal =
            Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + *x)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.display_rounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(dec("1.0").to_string(), "1.0000");
        assert_eq!(dec("45.67").to_string(), "45.6700");
        assert_eq!(dec("  2.5  ").to_string(), "2.5000");
    }

    #[test]
    fn test_from_str_accepts_exponent() {
        assert_eq!(dec("1e2").to_string(), "100.0000");
        assert_eq!(dec("2.5e-1").to_string(), "0.2500");
        assert!(Amount::from_str("ten").is_err());
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = dec("1.5");
        let b = dec("2.5");

        assert_eq!((a + b).to_string(), "4.0000");
        assert_eq!((b - a).to_string(), "1.0000");
        assert_eq!((-a).to_string(), "-1.5000");
    }

    #[test]
    fn test_epsilon_value() {
        assert_eq!(Amount::EPSILON, dec("0.005"));
        assert!(dec("0.0049").is_negligible());
        assert!(dec("-0.0049").is_negligible());
        assert!(!dec("0.005").is_negligible());
        assert!(Amount::ZERO.is_negligible());
    }

    #[test]
    fn test_split_sums_back_exactly() {
        let amount = dec("10");
        let shares = amount.split(3);

        assert_eq!(shares, vec![dec("3.3334"), dec("3.3333"), dec("3.3333")]);
        assert_eq!(shares.iter().sum::<Amount>(), amount);
    }

    #[test]
    fn test_split_even_amount() {
        let shares = dec("78").split(2);
        assert_eq!(shares, vec![dec("39"), dec("39")]);
    }

    #[test]
    fn test_split_zero_parts() {
        assert!(dec("5").split(0).is_empty());
    }

    #[test]
    fn test_display_rounded_half_even() {
        assert_eq!(dec("51.7099").display_rounded(), "51.71");
        assert_eq!(dec("0.125").display_rounded(), "0.12");
        assert_eq!(dec("0.135").display_rounded(), "0.14");
        assert_eq!(dec("3").display_rounded(), "3.00");
        assert_eq!(dec("-2.5").display_rounded(), "-2.50");
    }

    #[test]
    fn test_units_round_trip() {
        assert_eq!(dec("1.2345").units(), 12345);
        assert_eq!(Amount::from_units(12345), dec("1.2345"));
    }

    #[test]
    fn test_sum_of_amounts() {
        let total: Amount = vec![dec("1.1"), dec("2.2"), dec("-3.3")].into_iter().sum();
        assert!(total.is_zero());
    }
}
