//! Attendance views handed to presentation code

use serde::{Deserialize, Serialize};

use super::EventRecord;

/// A user's RSVP flag on one event together with the event's attendee count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    pub is_attending: bool,
    pub attendee_count: u32,
}

/// Events related to one user, as shown on their profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserEvents {
    /// Events the user created
    pub created: Vec<EventRecord>,
    /// Events the user RSVP'd to but did not create
    pub attending: Vec<EventRecord>,
}
