//! Document store adapters

mod memory;
mod sqlite;
mod watchers;

pub use memory::MemoryDocumentStore;
pub use sqlite::{DbConnection, DbManager, SqliteDocumentStore};
