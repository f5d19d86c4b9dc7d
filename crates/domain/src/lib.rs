//! # Peek Domain
//!
//! Business domain types and models for Peek.
//!
//! This crate contains:
//! - The event record and its attendance invariants
//! - User profiles
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Date and time helpers for the persisted event formats
//!
//! ## Architecture
//! - No dependencies on other Peek crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::event_date::{
    format_event_date, format_time_range, parse_event_date, parse_time_range,
};
