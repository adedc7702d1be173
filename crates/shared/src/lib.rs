//! Shared types, errors, and configuration for FMS.
//!
//! This crate provides common types used across all other crates:
//! - Money with exact integer minor units
//! - Currency codes and fractional-digit metadata
//! - Rounding policies for precision-losing operations
//! - Application-wide error types
//! - Configuration management and tracing setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, MoneyError, MoneyResult};
pub use types::{Currency, Money, RoundingPolicy};
