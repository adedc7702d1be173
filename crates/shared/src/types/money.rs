//! Money type with exact integer minor units and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as a signed count of minor units (e.g. cents) and
//! every operation that could lose precision takes an explicit
//! [`RoundingPolicy`]. Arithmetic is overflow-checked and currency-checked.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MoneyError, MoneyResult};
use crate::types::currency::{self, Currency, CurrencyMetadata};
use crate::types::rounding::RoundingPolicy;

/// Represents a monetary amount with currency.
///
/// The same `minor_units` value means different real amounts under different
/// currencies, so the currency takes part in equality and in every binary
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor_units: i64,
    currency: Currency,
}

impl Money {
    /// Creates Money directly from a minor-unit count. Never fails.
    #[must_use]
    pub const fn from_minor_units(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::from_minor_units(0, currency)
    }

    /// Creates Money from a decimal amount, scaling it to the currency's
    /// fractional digits with `rounding`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedCurrency` if the currency has no usable digit count.
    /// - `InexactAmount` if `rounding` is `Unnecessary` and digits would be lost.
    /// - `AmountOutOfRange` if the minor-unit count does not fit in `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fms_shared::types::{Currency, Money, RoundingPolicy};
    ///
    /// let money = Money::from_decimal(dec!(12.34), Currency::BRL, RoundingPolicy::HalfUp).unwrap();
    /// assert_eq!(money.minor_units(), 1234);
    /// ```
    pub fn from_decimal(
        amount: Decimal,
        currency: Currency,
        rounding: RoundingPolicy,
    ) -> MoneyResult<Self> {
        Self::from_decimal_with(currency::metadata(), amount, currency, rounding)
    }

    /// Same as [`Money::from_decimal`] with a caller-supplied metadata provider.
    pub fn from_decimal_with(
        metadata: &dyn CurrencyMetadata,
        amount: Decimal,
        currency: Currency,
        rounding: RoundingPolicy,
    ) -> MoneyResult<Self> {
        let digits = metadata.fraction_digits(currency)?;

        let scaled = rounding.round(amount, digits).ok_or_else(|| {
            debug!(%amount, %currency, digits, "rejected inexact amount");
            MoneyError::InexactAmount {
                amount,
                currency,
                scale: digits,
            }
        })?;

        // minor = major * 10^digits (ex: 12.34 BRL -> 1234)
        let out_of_range = || MoneyError::AmountOutOfRange { amount, currency };
        let factor = 10i64.checked_pow(digits).ok_or_else(out_of_range)?;
        let minor_units = scaled
            .checked_mul(Decimal::from(factor))
            .and_then(|minor| minor.to_i64())
            .ok_or_else(out_of_range)?;

        Ok(Self::from_minor_units(minor_units, currency))
    }

    /// Creates Money from a decimal amount that must already fit the
    /// currency's precision.
    ///
    /// # Errors
    ///
    /// Same as [`Money::from_decimal`] with `RoundingPolicy::Unnecessary`.
    pub fn from_exact_decimal(amount: Decimal, currency: Currency) -> MoneyResult<Self> {
        Self::from_decimal(amount, currency, RoundingPolicy::Unnecessary)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// The currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the decimal amount, e.g. `1234` BRL becomes `12.34`.
    ///
    /// Exact; the result carries the currency's scale.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` if the currency has no usable digit count.
    pub fn to_decimal(&self) -> MoneyResult<Decimal> {
        self.to_decimal_with(currency::metadata())
    }

    /// Same as [`Money::to_decimal`] with a caller-supplied metadata provider.
    pub fn to_decimal_with(&self, metadata: &dyn CurrencyMetadata) -> MoneyResult<Decimal> {
        let digits = metadata.fraction_digits(self.currency)?;
        Decimal::try_new(self.minor_units, digits)
            .map_err(|_| MoneyError::UnsupportedCurrency(self.currency.to_string()))
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.minor_units < 0
    }

    /// Adds two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` before any arithmetic, then `ArithmeticOverflow`.
    pub fn checked_add(self, other: Self) -> MoneyResult<Self> {
        self.ensure_same_currency(&other)?;
        self.minor_units
            .checked_add(other.minor_units)
            .map(|minor| Self::from_minor_units(minor, self.currency))
            .ok_or(MoneyError::ArithmeticOverflow { operation: "add" })
    }

    /// Subtracts `other` from `self`.
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` before any arithmetic, then `ArithmeticOverflow`.
    pub fn checked_sub(self, other: Self) -> MoneyResult<Self> {
        self.ensure_same_currency(&other)?;
        self.minor_units
            .checked_sub(other.minor_units)
            .map(|minor| Self::from_minor_units(minor, self.currency))
            .ok_or(MoneyError::ArithmeticOverflow {
                operation: "subtract",
            })
    }

    /// Negates the amount.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` for `i64::MIN`.
    pub fn checked_neg(self) -> MoneyResult<Self> {
        self.minor_units
            .checked_neg()
            .map(|minor| Self::from_minor_units(minor, self.currency))
            .ok_or(MoneyError::ArithmeticOverflow { operation: "negate" })
    }

    /// Absolute value.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` for `i64::MIN`.
    pub fn abs(self) -> MoneyResult<Self> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(self)
        }
    }

    /// Multiplies by a decimal factor and rounds back to whole minor units.
    ///
    /// The product is computed exactly in integers, so factors carrying all
    /// 28 fractional digits still round correctly.
    ///
    /// # Errors
    ///
    /// - `ArithmeticOverflow` if the product or the rounded result exceeds `i64`.
    /// - `InexactAmount` if `rounding` is `Unnecessary` and the product has a
    ///   fractional minor unit.
    pub fn multiply(self, factor: Decimal, rounding: RoundingPolicy) -> MoneyResult<Self> {
        let overflow = MoneyError::ArithmeticOverflow {
            operation: "multiply",
        };
        let negative = (self.minor_units < 0) != (factor.mantissa() < 0);
        let units = self.minor_units.unsigned_abs();
        let factor_units = factor.mantissa().unsigned_abs();
        let divisor = 10u128.pow(factor.scale());

        // |minor| * factor = whole + fraction + remainder / divisor
        let whole = u128::from(units)
            .checked_mul(factor_units / divisor)
            .ok_or_else(|| overflow.clone())?;
        let (fraction, remainder) = mul_div_rem(units, factor_units % divisor, divisor);
        let quotient = whole.checked_add(fraction).ok_or_else(|| overflow.clone())?;

        let limit = if negative {
            i64::MIN.unsigned_abs()
        } else {
            i64::MAX.unsigned_abs()
        };
        if quotient > u128::from(limit) {
            return Err(overflow);
        }

        let magnitude = if remainder == 0 {
            quotient
        } else {
            match rounding.rounds_away(negative, quotient, remainder, divisor) {
                Some(true) => quotient + 1,
                Some(false) => quotient,
                None => {
                    let amount = Decimal::from(self.minor_units)
                        .checked_mul(factor)
                        .ok_or(overflow)?;
                    return Err(MoneyError::InexactAmount {
                        amount,
                        currency: self.currency,
                        scale: 0,
                    });
                }
            }
        };

        let signed = i128::try_from(magnitude).map_err(|_| overflow.clone())?;
        let signed = if negative { -signed } else { signed };
        let minor_units = i64::try_from(signed).map_err(|_| overflow)?;
        Ok(Self::from_minor_units(minor_units, self.currency))
    }

    /// Orders two amounts of the same currency by minor units.
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` if the currencies differ.
    pub fn compare(&self, other: &Self) -> MoneyResult<Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.minor_units.cmp(&other.minor_units))
    }

    /// Sums amounts, starting from zero in `currency`.
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` on the first foreign amount, `ArithmeticOverflow`
    /// if the running total leaves the `i64` range.
    pub fn checked_sum<I>(currency: Currency, amounts: I) -> MoneyResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::zero(currency), Self::checked_add)
    }

    /// Splits the amount into `parts` pieces that sum exactly to the original.
    ///
    /// Uses floor division, so the remainder is always in `[0, parts)` even for
    /// negative amounts. The first `remainder` pieces receive one extra minor
    /// unit; pieces never differ by more than one.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `parts` is zero, does not fit in `i64`, or needs
    /// more memory than can be reserved.
    ///
    /// # Example
    ///
    /// ```
    /// use fms_shared::types::{Currency, Money};
    ///
    /// let parts = Money::from_minor_units(1234, Currency::BRL).allocate(3).unwrap();
    /// let minor: Vec<i64> = parts.iter().map(Money::minor_units).collect();
    /// assert_eq!(minor, vec![412, 411, 411]);
    /// ```
    pub fn allocate(&self, parts: usize) -> MoneyResult<Vec<Self>> {
        if parts == 0 {
            return Err(MoneyError::InvalidArgument(
                "allocation requires at least one part".to_string(),
            ));
        }
        let divisor = i64::try_from(parts).map_err(|_| {
            MoneyError::InvalidArgument(format!("cannot allocate into {parts} parts"))
        })?;

        let base = self.minor_units.div_euclid(divisor);
        let remainder = self.minor_units.rem_euclid(divisor);

        let mut pieces = Vec::new();
        pieces.try_reserve_exact(parts).map_err(|_| {
            MoneyError::InvalidArgument(format!("cannot allocate into {parts} parts"))
        })?;

        // Earlier slots absorb the extra unit
        pieces.extend((0..divisor).map(|slot| {
            let minor = if slot < remainder { base + 1 } else { base };
            Self::from_minor_units(minor, self.currency)
        }));
        Ok(pieces)
    }

    /// Splits the amount proportionally to integer weights using the Largest
    /// Remainder Method.
    ///
    /// Every share is floored first; the leftover minor units go one each to
    /// the shares with the largest fractional remainders, ties to the earlier
    /// slot. The sum always equals the original exactly.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `ratios` is empty or sums to zero.
    pub fn allocate_by_ratios(&self, ratios: &[u64]) -> MoneyResult<Vec<Self>> {
        let total: u128 = ratios.iter().map(|&r| u128::from(r)).sum();
        if total == 0 {
            return Err(MoneyError::InvalidArgument(
                "allocation ratios must contain a non-zero weight".to_string(),
            ));
        }
        let total = i128::try_from(total)
            .map_err(|_| MoneyError::InvalidArgument("allocation ratios too large".to_string()))?;

        let amount = i128::from(self.minor_units);
        let mut shares = Vec::with_capacity(ratios.len());
        let mut fractions = Vec::with_capacity(ratios.len());
        for (slot, &ratio) in ratios.iter().enumerate() {
            let weighted = amount * i128::from(ratio);
            shares.push(weighted.div_euclid(total));
            fractions.push((slot, weighted.rem_euclid(total)));
        }

        // Leftover is in [0, ratios.len())
        let allocated: i128 = shares.iter().sum();
        let leftover = usize::try_from(amount - allocated)
            .map_err(|_| MoneyError::ArithmeticOverflow { operation: "allocate" })?;

        fractions.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for &(slot, _) in fractions.iter().take(leftover) {
            shares[slot] += 1;
        }

        shares
            .into_iter()
            .map(|share| {
                i64::try_from(share)
                    .map(|minor| Self::from_minor_units(minor, self.currency))
                    .map_err(|_| MoneyError::ArithmeticOverflow { operation: "allocate" })
            })
            .collect()
    }

    fn ensure_same_currency(&self, other: &Self) -> MoneyResult<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }
}

/// Amounts in different currencies are unordered.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.currency == other.currency).then(|| self.minor_units.cmp(&other.minor_units))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(amount) => write!(f, "{amount} {}", self.currency),
            Err(_) => write!(f, "{} {} (minor units)", self.minor_units, self.currency),
        }
    }
}

/// `(a * b / divisor, a * b % divisor)` without a 256-bit intermediate.
///
/// Requires `b < divisor <= 10^28`, which keeps every partial product below
/// `2^127` and the quotient below `a`.
fn mul_div_rem(a: u64, b: u128, divisor: u128) -> (u128, u128) {
    let high = u128::from(a >> 32) * b;
    let low = u128::from(a & 0xFFFF_FFFF) * b;
    let high_remainder = high % divisor;
    let rest = (high_remainder << 32) + low;
    (((high / divisor) << 32) + rest / divisor, rest % divisor)
}
