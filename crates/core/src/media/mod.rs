//! Blob storage boundary for event images

pub mod ports;
