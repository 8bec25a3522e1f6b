//! Behavioral analytics: call success, promise keeping, and
//! identity-call correlation.

pub mod calls;
pub mod correlation;
pub mod promises;
pub mod trend;

pub use calls::CallAnalyzer;
pub use correlation::IdentityCorrelator;
pub use promises::PromiseAnalyzer;
