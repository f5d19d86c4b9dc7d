//! Creating and editing events

pub mod service;

pub use service::EventPublisher;
