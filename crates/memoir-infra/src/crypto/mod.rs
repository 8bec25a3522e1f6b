//! Content hashing.

pub mod hash;

pub use hash::Sha256TextHasher;
