//! RSVP service - core business logic
//!
//! Attendance lives inside the event document itself: the `rsvpList` map is
//! the source of truth for "is this user attending" and `attendeeCount` is
//! maintained next to it. A toggle is therefore a read-modify-write of the
//! whole document with no compare-and-set, and two toggles that interleave
//! (read A, read B, write A, write B) lose A's change. Per-user field writes
//! with a server-computed count would close that gap.

use std::sync::Arc;

use peek_domain::constants::EVENTS_COLLECTION;
use peek_domain::{AttendanceStatus, EventRecord, PeekError, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::ports::AuthProvider;
use crate::store::{decode_event, encode_event, DocumentCallback, DocumentStore, SubscriptionHandle};

/// Attendance service for the signed-in user
pub struct RsvpService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl RsvpService {
    /// Create a new RSVP service
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// RSVP the signed-in user to `event_id`, or withdraw an existing RSVP.
    ///
    /// The stored record is only changed by the final write; if that write
    /// fails nothing has been mutated from the caller's point of view.
    ///
    /// # Errors
    /// - `PeekError::Unauthenticated` when nobody is signed in
    /// - `PeekError::NotFound` when the event does not exist
    /// - `PeekError::ReadFailed` when the event cannot be read or decoded
    /// - `PeekError::WriteFailed` when the store rejects the update
    pub async fn toggle_attendance(&self, event_id: &str) -> Result<AttendanceStatus> {
        let user_id = self.require_user()?;
        let mut record = self.fetch(event_id).await?;

        let status = record.toggle_attendance(&user_id);
        let document = encode_event(&record)?;

        if let Err(err) = self.store.set(EVENTS_COLLECTION, event_id, document).await {
            warn!(event_id, error = %err, kind = err.label(), "failed to write attendance change");
            return Err(err.into_write_failed());
        }

        info!(
            event_id,
            attending = status.is_attending,
            attendee_count = status.attendee_count,
            "attendance toggled"
        );
        Ok(status)
    }

    /// Read the signed-in user's attendance without changing anything.
    ///
    /// # Errors
    /// Same as [`RsvpService::toggle_attendance`], minus write failures.
    pub async fn check_attendance(&self, event_id: &str) -> Result<AttendanceStatus> {
        let user_id = self.require_user()?;
        let record = self.fetch(event_id).await?;
        Ok(record.attendance_for(Some(&user_id)))
    }

    /// Follow the attendee count of `event_id` in real time.
    ///
    /// `on_change` runs once straight away and again after every change made
    /// by anyone. `is_attending` refers to whoever is signed in when the
    /// change arrives. Keep the handle and pass it to
    /// [`RsvpService::unsubscribe`]; a forgotten handle keeps the store
    /// listener alive.
    ///
    /// # Errors
    /// Returns whatever the store reports while registering.
    pub fn subscribe_attendance<F>(&self, event_id: &str, on_change: F) -> Result<SubscriptionHandle>
    where
        F: Fn(AttendanceStatus) + Send + Sync + 'static,
    {
        let auth = Arc::clone(&self.auth);
        let key = event_id.to_string();

        let callback: DocumentCallback = Arc::new(move |snapshot: Result<Option<Value>>| match snapshot {
            Ok(Some(value)) => match decode_event(&key, value) {
                Ok(record) => on_change(record.attendance_for(auth.current_user_id().as_deref())),
                Err(err) => debug!(event_id = %key, error = %err, "skipping undecodable event update"),
            },
            Ok(None) => debug!(event_id = %key, "watched event no longer exists"),
            Err(err) => debug!(event_id = %key, error = %err, "attendance subscription error"),
        });

        let handle = self.store.subscribe(EVENTS_COLLECTION, event_id, callback)?;
        debug!(event_id, handle = handle.id(), "attendance subscription registered");
        Ok(handle)
    }

    /// Stop an attendance subscription. Safe to call more than once.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.store.unsubscribe(handle);
    }

    fn require_user(&self) -> Result<String> {
        self.auth.current_user_id().ok_or(PeekError::Unauthenticated)
    }

    async fn fetch(&self, event_id: &str) -> Result<EventRecord> {
        let value = self
            .store
            .get(EVENTS_COLLECTION, event_id)
            .await
            .map_err(PeekError::into_read_failed)?
            .ok_or_else(|| PeekError::NotFound(format!("event {event_id}")))?;
        decode_event(event_id, value)
    }
}
