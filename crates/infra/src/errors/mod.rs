//! Error plumbing between infrastructure libraries and `PeekError`.

mod conversions;

pub use conversions::{map_join_error, InfraError};
