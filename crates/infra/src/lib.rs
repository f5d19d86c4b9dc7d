//! # Peek Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Document stores (in-memory and SQLite) with realtime subscriptions
//! - Session-based authentication state
//! - Local filesystem storage for event images
//! - Configuration loading, tracing setup and the application context
//!
//! ## Architecture
//! - Implements traits defined in `peek-core`
//! - Contains all "impure" code (I/O, databases, filesystem)

pub mod auth;
pub mod config;
pub mod context;
pub mod errors;
pub mod media;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use auth::SessionAuth;
pub use context::AppContext;
pub use errors::InfraError;
pub use media::LocalBlobStore;
pub use observability::init_tracing;
pub use store::{DbManager, MemoryDocumentStore, SqliteDocumentStore};
