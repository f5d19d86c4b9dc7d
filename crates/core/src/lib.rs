//! # Peek Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the document store, auth and
//!   blob storage
//! - RSVP, catalog, publishing and profile services
//!
//! ## Architecture Principles
//! - Only depends on `peek-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;
pub mod catalog;
pub mod media;
pub mod profile;
pub mod publishing;
pub mod rsvp;
pub mod store;
pub mod utils;

// Re-export specific items to avoid ambiguity
pub use auth::ports::AuthProvider;
pub use catalog::{filter_events, EventCatalog, EventFilter};
pub use media::ports::BlobUploader;
pub use profile::ProfileService;
pub use publishing::EventPublisher;
pub use rsvp::RsvpService;
pub use store::ports::{
    CollectionCallback, Document, DocumentCallback, DocumentStore, SubscriptionHandle,
};
pub use utils::clock::{Clock, SystemClock};
