//! User profiles and per-user views over the event collection

pub mod service;

pub use service::ProfileService;
