//! In-process backend for the shared order table.
//!
//! Rows are kept in the same shape a hosted table would use (indexed columns
//! plus a schema-flexible JSON payload) behind a [`tokio::sync::RwLock`], and
//! every write is published on a broadcast change feed.

mod encode;
mod store;

pub mod error;

pub use encode::OrderRow;
pub use error::{Error, Result};
pub use store::{DEFAULT_FEED_CAPACITY, MemoryStore};
