//! Core business logic for FMS.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `ledger` - Account classification and normal balance rules

pub mod ledger;
