use bigdecimal::{BigDecimal, ParseBigDecimalError, RoundingMode};
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
const SCALE: i64 = 100;
/// Largest magnitude accepted anywhere in the ledger: $1,000,000,000,000.00.
/// Kept well under 2^53 cents so JSON numbers carry every cent exactly.
const MAX_CENTS: i64 = 100_000_000_000_000;

#[derive(Debug, Clone, Copy, Default)]
/// A monetary value stored in cents.
///
/// Sale prices and bidder totals are always summed in whole cents, so a
/// receipt never disagrees with the revenue line by a rounding error.
/// Input is rounded half away from zero to the cent, which makes $0.01 the
/// smallest positive amount. Every value stays within
/// ±$1,000,000,000,000.00; sums beyond that are refused by
/// [`Money::checked_add`].
///
/// # Examples
/// ```
/// use auction_ledger::common::money::Money;
///
/// let price: Money = "50".parse().unwrap();
/// assert_eq!(price.as_cents(), 5000);
/// assert_eq!(price.to_string_2dp(), "50.00");
/// ```
pub struct Money(i64);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn zero() -> Self {
        Money(0)
    }

    pub fn as_cents(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn max() -> Self {
        Money(MAX_CENTS)
    }

    /// Adds two amounts, returning `None` when the result leaves the
    /// accepted range.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0
            .checked_add(rhs.0)
            .filter(|cents| cents.abs() <= MAX_CENTS)
            .map(Money)
    }

    /// Converts a floating point amount, rounding to the nearest cent.
    /// Returns `None` for NaN, infinities and values out of range.
    pub fn from_f64(value: f64) -> Option<Self> {
        let bd = BigDecimal::from_f64(value)?;
        Self::from_decimal(bd)
    }

    pub fn to_f64(&self) -> f64 {
        self.to_decimal().to_f64().unwrap_or(0.0)
    }

    pub fn to_string_2dp(&self) -> String {
        format!("{:.2}", self.to_decimal())
    }

    fn to_decimal(self) -> BigDecimal {
        BigDecimal::from(self.0) / BigDecimal::from(SCALE)
    }

    fn from_decimal(bd: BigDecimal) -> Option<Self> {
        let rounded = bd.with_scale_round(2, RoundingMode::HalfUp);
        (rounded * BigDecimal::from(SCALE))
            .to_i64()
            .filter(|cents| cents.abs() <= MAX_CENTS)
            .map(Money)
    }
}

impl std::str::FromStr for Money {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().trim_start_matches('$');
        if t.is_empty() {
            return Err(ParseBigDecimalError::Other("empty amount".into()));
        }

        let bd: BigDecimal = t.parse()?;
        Self::from_decimal(bd).ok_or_else(|| ParseBigDecimalError::Other("amount out of range".into()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_2dp())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {value}")))
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
