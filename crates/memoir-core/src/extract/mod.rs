//! Transcript psychology extraction.

pub mod transcript;

pub use transcript::TranscriptExtractor;
