//! Infrastructure implementations for Memoir.
//!
//! Implements the ports defined in `memoir-core`: SQLite repositories over
//! a split read/write pool, OpenAI-backed embedding and classification
//! clients, and SHA-256 content hashing.

pub mod crypto;
pub mod openai;
pub mod sqlite;
