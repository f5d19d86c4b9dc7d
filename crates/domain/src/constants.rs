//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Store layout
pub const EVENTS_COLLECTION: &str = "events";
pub const EVENT_IMAGES_PREFIX: &str = "event_images";
pub const USERS_COLLECTION: &str = "Users";

// Persisted formats
pub const EVENT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const EVENT_TIME_FORMAT: &str = "%I:%M %p";
pub const TIME_RANGE_SEPARATOR: &str = " - ";

// Catalog filtering
pub const ALL_CATEGORIES: &str = "All";

// Uploads
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

// Profiles
pub const MIN_PHONE_LENGTH: usize = 10;
