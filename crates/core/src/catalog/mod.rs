//! Event catalog: current events, staleness cleanup and filtering

pub mod filter;
pub mod service;

pub use filter::{filter_events, EventFilter};
pub use service::EventCatalog;
