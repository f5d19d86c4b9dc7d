//! SQLite-backed document store.

mod document_store;
mod manager;

pub use document_store::SqliteDocumentStore;
pub use manager::{DbConnection, DbManager};
