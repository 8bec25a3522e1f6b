//! SQLite repository implementations over a split read/write pool.

pub mod call;
pub mod identity;
pub mod memory;
pub mod pool;
pub mod profile;
pub mod promise;
pub mod user;

pub use pool::DatabasePool;
