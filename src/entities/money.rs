use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MINOR_PER_UNIT: i64 = 100;
/// Largest amount, in whole units, that a single price may take.
const MAX_UNITS: i64 = 1_000_000_000_000;

/// Rounds to the nearest integer with ties going up, i.e. `floor(x + 0.5)`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// An exact amount of money, held in minor units (1/100 of a currency unit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(MAX_UNITS * MINOR_PER_UNIT);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn from_units(units: i64) -> Self {
        Self(units.clamp(-MAX_UNITS, MAX_UNITS) * MINOR_PER_UNIT)
    }

    /// Converts a decimal amount to the nearest minor unit. Non-finite and
    /// negative inputs are clamped to zero, large ones to [`Money::MAX`].
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() || amount <= 0.0 {
            return Self::ZERO;
        }
        if amount >= MAX_UNITS as f64 {
            return Self::MAX;
        }

        Self(round_half_up(amount * MINOR_PER_UNIT as f64) as i64)
    }

    /// Rounds a decimal amount half-up to whole currency units, clamped to
    /// `[0, Money::MAX]`.
    pub fn round_to_units(amount: f64) -> Self {
        Self::checked_round_to_units(amount).unwrap_or(Self::MAX)
    }

    /// Like [`Money::round_to_units`] but `None` when the amount is above
    /// [`Money::MAX`].
    pub fn checked_round_to_units(amount: f64) -> Option<Self> {
        if amount.is_nan() || amount <= 0.0 {
            return Some(Self::ZERO);
        }

        let units = round_half_up(amount);
        if units > MAX_UNITS as f64 {
            return None;
        }

        Some(Self::from_units(units as i64))
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / MINOR_PER_UNIT as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % MINOR_PER_UNIT == 0 {
            write!(f, "{}₺", self.0 / MINOR_PER_UNIT)
        } else {
            write!(f, "{:.2}₺", self.as_decimal())
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount))
    }
}
