//! Identity-to-memory projection.

pub mod projector;

pub use projector::IdentityProjector;
