//! Rounding rules for precision-losing money operations.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::MoneyError;

/// Rule applied when a decimal value has more digits than the target scale.
///
/// Supplied by the caller at every conversion or scaling that can lose
/// precision. `Unnecessary` forbids rounding altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingPolicy {
    /// Away from zero.
    Up,
    /// Toward zero (truncation).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    HalfUp,
    /// Nearest neighbour, ties toward zero.
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour (banker's rounding).
    #[default]
    HalfEven,
    /// No rounding allowed; inexact values are rejected.
    Unnecessary,
}

impl RoundingPolicy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Ceiling,
        Self::Floor,
        Self::HalfUp,
        Self::HalfDown,
        Self::HalfEven,
        Self::Unnecessary,
    ];

    /// The `rust_decimal` strategy behind this policy, `None` for `Unnecessary`.
    #[must_use]
    pub const fn strategy(self) -> Option<RoundingStrategy> {
        match self {
            Self::Up => Some(RoundingStrategy::AwayFromZero),
            Self::Down => Some(RoundingStrategy::ToZero),
            Self::Ceiling => Some(RoundingStrategy::ToPositiveInfinity),
            Self::Floor => Some(RoundingStrategy::ToNegativeInfinity),
            Self::HalfUp => Some(RoundingStrategy::MidpointAwayFromZero),
            Self::HalfDown => Some(RoundingStrategy::MidpointTowardZero),
            Self::HalfEven => Some(RoundingStrategy::MidpointNearestEven),
            Self::Unnecessary => None,
        }
    }

    /// Rounds `value` to `decimal_places`.
    ///
    /// Returns `None` only for `Unnecessary` when a non-zero digit would be
    /// dropped. Trailing zeros past the scale are not a loss.
    #[must_use]
    pub fn round(self, value: Decimal, decimal_places: u32) -> Option<Decimal> {
        match self.strategy() {
            Some(strategy) => Some(value.round_dp_with_strategy(decimal_places, strategy)),
            None => {
                let truncated = value.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero);
                (truncated == value).then_some(truncated)
            }
        }
    }

    /// Decides whether the inexact magnitude `quotient + remainder / divisor`
    /// steps one unit away from zero. `remainder` must lie in `(0, divisor)`.
    ///
    /// Returns `None` for `Unnecessary`.
    pub(crate) fn rounds_away(
        self,
        negative: bool,
        quotient: u128,
        remainder: u128,
        divisor: u128,
    ) -> Option<bool> {
        match (self, remainder.cmp(&(divisor - remainder))) {
            (Self::Unnecessary, _) => None,
            (Self::Up, _) => Some(true),
            (Self::Down, _) => Some(false),
            (Self::Ceiling, _) => Some(!negative),
            (Self::Floor, _) => Some(negative),
            (_, Ordering::Greater) => Some(true),
            (_, Ordering::Less) => Some(false),
            (Self::HalfUp, Ordering::Equal) => Some(true),
            (Self::HalfDown, Ordering::Equal) => Some(false),
            (Self::HalfEven, Ordering::Equal) => Some(quotient % 2 == 1),
        }
    }

    /// Canonical configuration name, e.g. `HALF_EVEN`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Ceiling => "CEILING",
            Self::Floor => "FLOOR",
            Self::HalfUp => "HALF_UP",
            Self::HalfDown => "HALF_DOWN",
            Self::HalfEven => "HALF_EVEN",
            Self::Unnecessary => "UNNECESSARY",
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingPolicy {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == normalized)
            .ok_or_else(|| MoneyError::InvalidArgument(format!("unknown rounding policy: {s}")))
    }
}
