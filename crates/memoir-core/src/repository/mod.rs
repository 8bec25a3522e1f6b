//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (memoir-infra) implements. The core crate never depends on any specific
//! storage technology.

pub mod call;
pub mod identity;
pub mod memory;
pub mod profile;
pub mod promise;
pub mod user;
