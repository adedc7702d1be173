//! Account classification and normal balance rules.
//!
//! - Asset/Expense: balance += debit - credit (debit-normal)
//! - Liability/Equity/Revenue: balance += credit - debit (credit-normal)

use std::fmt;
use std::str::FromStr;

use fms_shared::Money;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Top-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountGroup {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

/// The side on which an account's balance naturally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalanceSide {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl AccountGroup {
    /// Returns the normal balance side for this group.
    #[must_use]
    pub const fn normal_balance_side(self) -> NormalBalanceSide {
        match self {
            Self::Asset | Self::Expense => NormalBalanceSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalanceSide::Credit,
        }
    }

    /// Only asset and liability accounts carry a liquidity classification.
    #[must_use]
    pub const fn allows_liquidity_class(self) -> bool {
        matches!(self, Self::Asset | Self::Liability)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountGroup {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::UnknownAccountGroup(s.to_string())),
        }
    }
}

impl NormalBalanceSide {
    /// Calculates the signed balance change for a debit/credit pair.
    ///
    /// Debit-normal: `debit - credit`. Credit-normal: `credit - debit`.
    ///
    /// # Errors
    ///
    /// `LedgerError::Money` wrapping `CurrencyMismatch` if the two amounts
    /// differ in currency, or `ArithmeticOverflow` if the difference leaves
    /// the `i64` range.
    pub fn balance_change(self, debit: Money, credit: Money) -> Result<Money, LedgerError> {
        let change = match self {
            Self::Debit => debit.checked_sub(credit)?,
            Self::Credit => credit.checked_sub(debit)?,
        };
        Ok(change)
    }
}

impl fmt::Display for NormalBalanceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => f.write_str("debit"),
            Self::Credit => f.write_str("credit"),
        }
    }
}
