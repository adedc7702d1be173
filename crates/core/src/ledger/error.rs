//! Ledger error types.

use fms_shared::MoneyError;
use thiserror::Error;

/// Errors that can occur during ledger classification.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account group name is not one of the five classifications.
    #[error("Unknown account group: {0}")]
    UnknownAccountGroup(String),

    /// Underlying money operation failed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAccountGroup(_) => "UNKNOWN_ACCOUNT_GROUP",
            Self::Money(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Money(MoneyError::ArithmeticOverflow { .. }) => 422,
            Self::UnknownAccountGroup(_) | Self::Money(_) => 400,
        }
    }
}
