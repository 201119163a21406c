//! Concrete historic stores.
//!
//! - [`MemoryStore`]: process-local, for tests and short-lived tools
//! - [`SqliteStore`]: durable, with a versioned schema

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use schema::{SCHEMA_MAGIC, SCHEMA_VERSION};
pub use sqlite::SqliteStore;
