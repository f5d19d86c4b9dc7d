//! Event record as persisted under `events/{id}`

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{AttendanceStatus, EventDraft, EventEdit};
use crate::utils::event_date::{parse_event_date, parse_time_range};
use crate::Result;

/// A listed event.
///
/// `attendee_count` always equals the number of `true` entries in
/// `attendance`; only [`EventRecord::add_attendee`] and
/// [`EventRecord::remove_attendee`] touch either of them. `id` and
/// `creator_id` never change once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRecord {
    #[serde(rename = "eventId")]
    id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    /// `DD/MM/YYYY`
    pub date: String,
    /// Free text, usually `hh:mm AM - hh:mm PM`
    pub time: String,
    pub location: String,
    #[serde(rename = "zone")]
    pub zone_label: String,
    attendee_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creator_id: Option<String>,
    #[serde(rename = "rsvpList")]
    attendance: BTreeMap<String, bool>,
}

impl EventRecord {
    /// Build a brand new record from a validated draft. New events start with
    /// no attendees.
    pub fn create(
        id: impl Into<String>,
        draft: EventDraft,
        creator_id: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            zone_label: draft.zone_label,
            attendee_count: 0,
            image_url,
            creator_id: Some(creator_id.into()),
            attendance: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.creator_id.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn attendee_count(&self) -> u32 {
        self.attendee_count
    }

    /// RSVP history: `true` for users currently attending, `false` for users
    /// who withdrew.
    pub fn attendance(&self) -> &BTreeMap<String, bool> {
        &self.attendance
    }

    /// Fill in the id from the store key when the document was written
    /// without one. An id that is already set is left alone.
    pub fn assign_id_if_missing(&mut self, key: &str) {
        if self.id.is_empty() {
            self.id = key.to_string();
        }
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.creator_id.as_deref() == Some(user_id)
    }

    pub fn is_attending(&self, user_id: &str) -> bool {
        self.attendance.get(user_id).copied().unwrap_or(false)
    }

    /// Mark `user_id` as attending. Returns `false` if they already were.
    pub fn add_attendee(&mut self, user_id: &str) -> bool {
        if self.is_attending(user_id) {
            return false;
        }
        self.attendance.insert(user_id.to_string(), true);
        self.attendee_count = self.attendee_count.saturating_add(1);
        true
    }

    /// Withdraw `user_id`'s RSVP, keeping the entry as `false`. The count
    /// never drops below zero even if the stored count was already stale.
    pub fn remove_attendee(&mut self, user_id: &str) -> bool {
        if !self.is_attending(user_id) {
            return false;
        }
        self.attendance.insert(user_id.to_string(), false);
        self.attendee_count = self.attendee_count.saturating_sub(1);
        true
    }

    /// Flip `user_id`'s RSVP and report the resulting state.
    pub fn toggle_attendance(&mut self, user_id: &str) -> AttendanceStatus {
        if self.is_attending(user_id) {
            self.remove_attendee(user_id);
        } else {
            self.add_attendee(user_id);
        }
        self.attendance_for(Some(user_id))
    }

    /// Attendance as seen by `user_id`; a signed-out viewer never attends.
    pub fn attendance_for(&self, user_id: Option<&str>) -> AttendanceStatus {
        AttendanceStatus {
            is_attending: user_id.is_some_and(|user| self.is_attending(user)),
            attendee_count: self.attendee_count,
        }
    }

    /// Overwrite the editable descriptive fields.
    pub fn apply_edit(&mut self, edit: EventEdit) {
        self.title = edit.title;
        self.category = edit.category;
        self.date = edit.date;
        self.time = edit.time;
        self.location = edit.location;
        self.zone_label = edit.zone_label;
    }

    /// Parsed `date`.
    ///
    /// # Errors
    /// Returns `PeekError::ParseFailed` when the date is not `DD/MM/YYYY`.
    pub fn event_date(&self) -> Result<NaiveDate> {
        parse_event_date(&self.date)
    }

    /// Start and end of the event when `time` holds a formatted range.
    pub fn time_range(&self) -> Option<(NaiveTime, NaiveTime)> {
        parse_time_range(&self.time)
    }
}
