//! Application-wide error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Currency;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias using `MoneyError`.
pub type MoneyResult<T> = Result<T, MoneyError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Configuration could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Errors raised by `Money` and the currency metadata provider.
///
/// Every variant is a caller error; none of them is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Operands of a binary operation carry different currencies.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the receiver.
        left: Currency,
        /// Currency of the argument.
        right: Currency,
    },

    /// The result does not fit in signed 64-bit minor units.
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Name of the operation that overflowed.
        operation: &'static str,
    },

    /// A decimal amount scales to a minor-unit count outside the `i64` range.
    #[error("Amount out of range for minor units: {amount} {currency}")]
    AmountOutOfRange {
        /// The decimal amount as supplied.
        amount: Decimal,
        /// Target currency.
        currency: Currency,
    },

    /// Strict conversion was requested but the value has too many digits.
    #[error("{amount} {currency} cannot be represented exactly with {scale} fractional digits")]
    InexactAmount {
        /// The value that would need rounding.
        amount: Decimal,
        /// Currency of the operation.
        currency: Currency,
        /// Number of fractional digits available.
        scale: u32,
    },

    /// The currency is malformed, unknown, or has no usable digit count.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// A structural precondition was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl MoneyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::ArithmeticOverflow { .. } => "ARITHMETIC_OVERFLOW",
            Self::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::InexactAmount { .. } => "INEXACT_AMOUNT",
            Self::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
        }
    }
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::ArithmeticOverflow { .. } => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
