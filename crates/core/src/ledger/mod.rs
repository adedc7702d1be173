//! Ledger rules consumed from Money.
//!
//! Only the classification side of the ledger lives here: which side of a
//! balance is normal for each account group, and the signed change a
//! debit/credit pair makes to it.

pub mod balance;
pub mod error;

pub use balance::{AccountGroup, NormalBalanceSide};
pub use error::LedgerError;
