//! Exact currency amounts.
//!
//! Providers speak integer minor units (pence) on the wire. [`MoneyAmount`]
//! converts at that edge and holds a two-place [`Decimal`] everywhere else.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Number of fractional digits in a major-unit amount.
const SCALE: u32 = 2;

/// An exact amount of money with two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MoneyAmount(Decimal);

impl MoneyAmount {
    pub const ZERO: MoneyAmount = MoneyAmount(Decimal::ZERO);

    /// Amount from integer minor units: `minor / 100`.
    pub fn from_minor_units(minor: i64) -> Self {
        Self(Decimal::new(minor, SCALE))
    }

    /// Amount from a decimal, rounded half-to-even to two places.
    pub fn from_decimal(value: Decimal) -> Self {
        let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(SCALE);
        Self(rounded)
    }

    /// Integer minor units for the wire.
    pub fn to_minor_units(&self) -> Result<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .ok_or(Error::InvalidAmount(*self))
    }

    /// The underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<Decimal> for MoneyAmount {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl Add for MoneyAmount {
    type Output = MoneyAmount;

    fn add(self, rhs: MoneyAmount) -> MoneyAmount {
        MoneyAmount(self.0 + rhs.0)
    }
}

impl Sub for MoneyAmount {
    type Output = MoneyAmount;

    fn sub(self, rhs: MoneyAmount) -> MoneyAmount {
        MoneyAmount(self.0 - rhs.0)
    }
}

impl Neg for MoneyAmount {
    type Output = MoneyAmount;

    fn neg(self) -> MoneyAmount {
        MoneyAmount(-self.0)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print "-0.00".
        let value = if self.0.is_zero() { Decimal::ZERO } else { self.0 };
        write!(f, "{:.2}", value)
    }
}
