//! Property-based tests for money operations.
//!
//! - Property 1: Exact decimal round trip
//! - Property 2: Allocation sum, spread and identity
//! - Property 3: Currency safety
//! - Property 4: Overflow safety
//! - Property 5: Exact multiplication

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::currency::Currency;
use super::money::Money;
use super::rounding::RoundingPolicy;
use crate::error::MoneyError;

/// Currencies with 0, 2, 3 and 4 fractional digits.
fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::JPY),
        Just(Currency::USD),
        Just(Currency::BRL),
        Just(Currency::KWD),
        Just(Currency::CLF),
    ]
}

/// Any minor-unit count, including the extremes.
fn minor_units() -> impl Strategy<Value = i64> {
    prop_oneof![
        any::<i64>(),
        -1_000_000i64..1_000_000i64,
        Just(i64::MAX),
        Just(i64::MIN),
    ]
}

/// Allocation part count (1 to 200).
fn parts() -> impl Strategy<Value = usize> {
    1usize..200
}

fn rounding() -> impl Strategy<Value = RoundingPolicy> {
    prop::sample::select(RoundingPolicy::ALL.to_vec())
}

/// Rounds `numerator / divisor` to an integer with signed `i128` arithmetic.
///
/// `None` when the quotient is inexact under `Unnecessary`.
fn round_quotient(numerator: i128, divisor: i128, rounding: RoundingPolicy) -> Option<i128> {
    let quotient = numerator / divisor;
    let remainder = numerator % divisor;
    if remainder == 0 {
        return Some(quotient);
    }
    let away = quotient + numerator.signum();
    let twice = 2 * remainder.abs();
    match rounding {
        RoundingPolicy::Unnecessary => None,
        RoundingPolicy::Down => Some(quotient),
        RoundingPolicy::Up => Some(away),
        RoundingPolicy::Ceiling => Some(quotient.max(away)),
        RoundingPolicy::Floor => Some(quotient.min(away)),
        _ if twice > divisor => Some(away),
        _ if twice < divisor => Some(quotient),
        RoundingPolicy::HalfUp => Some(away),
        RoundingPolicy::HalfDown => Some(quotient),
        RoundingPolicy::HalfEven if quotient % 2 == 0 => Some(quotient),
        RoundingPolicy::HalfEven => Some(away),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property 1: Exact decimal round trip
    // =========================================================================

    /// *For any* amount representable at the currency's precision,
    /// `to_decimal(from_exact_decimal(amount))` SHALL equal `amount`.
    #[test]
    fn prop_exact_decimal_round_trip(
        currency in currency(),
        minor in minor_units(),
    ) {
        let digits = currency.fraction_digits().unwrap();
        let amount = Decimal::new(minor, digits);
        let money = Money::from_exact_decimal(amount, currency).unwrap();
        prop_assert_eq!(money.minor_units(), minor);
        prop_assert_eq!(money.to_decimal().unwrap(), amount);
    }

    /// *For any* amount with one digit beyond the currency's precision and a
    /// non-zero last digit, strict conversion SHALL fail with `InexactAmount`.
    #[test]
    fn prop_strict_conversion_rejects_extra_digit(
        currency in currency(),
        minor in -1_000_000_000i64..1_000_000_000i64,
        last_digit in 1i64..10,
    ) {
        let digits = currency.fraction_digits().unwrap();
        let amount = Decimal::new(minor * 10 + last_digit, digits + 1);
        let result = Money::from_decimal(amount, currency, RoundingPolicy::Unnecessary);
        let is_inexact = matches!(result, Err(MoneyError::InexactAmount { .. }));
        prop_assert!(is_inexact);
    }

    // =========================================================================
    // Property 2: Allocation sum, spread and identity
    // =========================================================================

    /// *For any* Money and part count, the allocated minor units SHALL sum
    /// exactly to the original.
    #[test]
    fn prop_allocate_sum_invariant(
        minor in minor_units(),
        parts in parts(),
    ) {
        let money = Money::from_minor_units(minor, Currency::USD);
        let result = money.allocate(parts).unwrap();
        prop_assert_eq!(result.len(), parts);
        let sum: i128 = result.iter().map(|m| i128::from(m.minor_units())).sum();
        prop_assert_eq!(sum, i128::from(minor));
    }

    /// *For any* allocation, max - min SHALL be at most one minor unit, and the
    /// larger pieces SHALL come first.
    #[test]
    fn prop_allocate_spread_at_most_one(
        minor in minor_units(),
        parts in parts(),
    ) {
        let money = Money::from_minor_units(minor, Currency::EUR);
        let result: Vec<i64> = money.allocate(parts).unwrap().iter().map(Money::minor_units).collect();
        let max = result.iter().copied().max().unwrap();
        let min = result.iter().copied().min().unwrap();
        prop_assert!(i128::from(max) - i128::from(min) <= 1);
        prop_assert!(result.windows(2).all(|w| w[0] >= w[1]));
    }

    /// *For any* Money, `allocate(1)` SHALL yield exactly that Money.
    #[test]
    fn prop_allocate_identity(
        minor in minor_units(),
        currency in currency(),
    ) {
        let money = Money::from_minor_units(minor, currency);
        prop_assert_eq!(money.allocate(1).unwrap(), vec![money]);
    }

    /// *For any* weights with a non-zero total, ratio allocation SHALL sum
    /// exactly to the original.
    #[test]
    fn prop_allocate_by_ratios_sum_invariant(
        minor in minor_units(),
        ratios in prop::collection::vec(0u64..1_000, 1..12),
    ) {
        prop_assume!(ratios.iter().any(|r| *r > 0));
        let money = Money::from_minor_units(minor, Currency::BRL);
        let result = money.allocate_by_ratios(&ratios).unwrap();
        prop_assert_eq!(result.len(), ratios.len());
        let sum: i128 = result.iter().map(|m| i128::from(m.minor_units())).sum();
        prop_assert_eq!(sum, i128::from(minor));
    }

    // =========================================================================
    // Property 3: Currency safety
    // =========================================================================

    /// *For any* operand values, add/subtract/compare across currencies SHALL
    /// fail with `CurrencyMismatch`.
    #[test]
    fn prop_cross_currency_operations_fail(
        left in minor_units(),
        right in minor_units(),
    ) {
        let usd = Money::from_minor_units(left, Currency::USD);
        let eur = Money::from_minor_units(right, Currency::EUR);
        let add_mismatch = matches!(usd.checked_add(eur), Err(MoneyError::CurrencyMismatch { .. }));
        let sub_mismatch = matches!(usd.checked_sub(eur), Err(MoneyError::CurrencyMismatch { .. }));
        let cmp_mismatch = matches!(usd.compare(&eur), Err(MoneyError::CurrencyMismatch { .. }));
        prop_assert!(add_mismatch);
        prop_assert!(sub_mismatch);
        prop_assert!(cmp_mismatch);
    }

    // =========================================================================
    // Property 4: Overflow safety
    // =========================================================================

    /// *For any* pair, add/subtract SHALL either return the exact mathematical
    /// result or fail with `ArithmeticOverflow`.
    #[test]
    fn prop_add_subtract_never_wrap(
        left in minor_units(),
        right in minor_units(),
    ) {
        let a = Money::from_minor_units(left, Currency::USD);
        let b = Money::from_minor_units(right, Currency::USD);

        let exact_sum = i128::from(left) + i128::from(right);
        match a.checked_add(b) {
            Ok(sum) => prop_assert_eq!(i128::from(sum.minor_units()), exact_sum),
            Err(err) => {
                prop_assert_eq!(err, MoneyError::ArithmeticOverflow { operation: "add" });
                prop_assert!(i64::try_from(exact_sum).is_err());
            }
        }

        let exact_diff = i128::from(left) - i128::from(right);
        match a.checked_sub(b) {
            Ok(diff) => prop_assert_eq!(i128::from(diff.minor_units()), exact_diff),
            Err(err) => {
                prop_assert_eq!(err, MoneyError::ArithmeticOverflow { operation: "subtract" });
                prop_assert!(i64::try_from(exact_diff).is_err());
            }
        }
    }

    /// *For any* integer factor, multiply SHALL either return the exact product
    /// or fail with `ArithmeticOverflow`.
    #[test]
    fn prop_multiply_never_wraps(
        minor in minor_units(),
        factor in -1_000i64..1_000,
    ) {
        let money = Money::from_minor_units(minor, Currency::USD);
        let exact = i128::from(minor) * i128::from(factor);
        match money.multiply(Decimal::from(factor), RoundingPolicy::Unnecessary) {
            Ok(product) => prop_assert_eq!(i128::from(product.minor_units()), exact),
            Err(err) => {
                prop_assert_eq!(err, MoneyError::ArithmeticOverflow { operation: "multiply" });
                prop_assert!(i64::try_from(exact).is_err());
            }
        }
    }

    // =========================================================================
    // Property 5: Exact multiplication
    // =========================================================================

    /// *For any* factor with up to 28 fractional digits and any policy,
    /// multiply SHALL return the exactly rounded product, fail with
    /// `InexactAmount` only under `Unnecessary`, and fail with
    /// `ArithmeticOverflow` only when the result leaves `i64`.
    #[test]
    fn prop_multiply_rounds_exact_product(
        minor in minor_units(),
        mantissa in any::<i64>(),
        scale in 0u32..=28,
        rounding in rounding(),
    ) {
        let money = Money::from_minor_units(minor, Currency::USD);
        let factor = Decimal::new(mantissa, scale);
        let numerator = i128::from(minor) * i128::from(mantissa);
        let divisor = 10i128.pow(scale);
        let truncated_fits = i64::try_from(numerator / divisor).is_ok();
        let expected = round_quotient(numerator, divisor, rounding);

        match money.multiply(factor, rounding) {
            Ok(product) => prop_assert_eq!(Some(i128::from(product.minor_units())), expected),
            Err(MoneyError::InexactAmount { .. }) => {
                prop_assert_eq!(expected, None);
                prop_assert!(truncated_fits);
            }
            Err(MoneyError::ArithmeticOverflow { operation: "multiply" }) => {
                let rounded_fits = expected.is_none_or(|e| i64::try_from(e).is_ok());
                prop_assert!(!truncated_fits || !rounded_fits);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}
