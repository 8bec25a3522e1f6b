//! Memory store: creation with dedup, similarity search, and insights.

pub mod insights;
pub mod service;

pub use service::{MemoryService, NewMemory, DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_THRESHOLD};
