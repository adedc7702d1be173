//! Common types used across the application.

pub mod currency;
pub mod money;
pub mod rounding;

#[cfg(test)]
mod money_props;

pub use currency::{Currency, CurrencyMetadata, CurrencyTable};
pub use money::Money;
pub use rounding::RoundingPolicy;
