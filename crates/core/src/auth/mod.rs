//! Authentication boundary

pub mod ports;
