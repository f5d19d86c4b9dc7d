//! Domain utilities

pub mod event_date;
