//! RSVP handling: per-user attendance and the live attendee count

pub mod service;

pub use service::RsvpService;
