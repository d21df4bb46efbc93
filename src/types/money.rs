//! Money type for the wallet service
//!
//! Amounts are stored as an integer count of minor currency units (cents).
//! All arithmetic is exact, checked integer arithmetic; there is no floating
//! point anywhere in the balance path, and an overflow is reported as `None`
//! instead of wrapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An amount of money in minor units (cents)
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    /// Number of decimal places between minor and major units
    pub const DECIMALS: u32 = 2;

    pub const ZERO: Money = Money(0);

    pub fn as_minor(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checked addition, `None` on overflow
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction, `None` on overflow
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Total of `amounts`, `None` if any partial sum overflows
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.checked_add(amount))
    }

    /// Amount expressed in major units, e.g. `Money(1050)` -> `10.50`
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, Self::DECIMALS)
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Money(minor)
    }
}

impl FromStr for Money {
    type Err = std::num::ParseIntError;

    /// Parses a plain integer count of minor units, as written in dump files
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Money)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}
