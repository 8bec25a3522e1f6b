//! Shared domain types for Memoir.
//!
//! This crate contains the core domain types used across the Memoir platform:
//! memory records, pattern profiles, call/promise/identity records, behavioral
//! analytics results, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod analytics;
pub mod call;
pub mod error;
pub mod identity;
pub mod insights;
pub mod memory;
pub mod profile;
pub mod promise;
