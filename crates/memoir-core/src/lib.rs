//! Business logic and trait definitions for Memoir.
//!
//! This crate defines the "ports" (repository, embedder, and classifier
//! traits) that the infrastructure layer implements. It depends only on
//! `memoir-types` -- never on `memoir-infra` or any database/IO crate.

pub mod analytics;
pub mod classify;
pub mod embedding;
pub mod extract;
pub mod hash;
pub mod identity;
pub mod memory;
pub mod pattern;
pub mod repository;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;
