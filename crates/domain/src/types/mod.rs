//! Domain types and models

pub mod attendance;
pub mod draft;
pub mod event;
pub mod profile;

pub use attendance::{AttendanceStatus, UserEvents};
pub use draft::{EventDraft, EventEdit, ImageUpload};
pub use event::EventRecord;
pub use profile::UserProfile;
