//! Event publishing service - core business logic

use std::sync::Arc;

use peek_domain::constants::{EVENTS_COLLECTION, EVENT_IMAGES_PREFIX};
use peek_domain::{EventDraft, EventEdit, EventRecord, ImageUpload, PeekError, Result};
use tracing::{info, warn};

use crate::auth::ports::AuthProvider;
use crate::media::ports::BlobUploader;
use crate::store::{decode_event, encode_event, DocumentStore};
use crate::utils::clock::{Clock, SystemClock};

/// Creates events (image first, then the record) and applies creator edits
pub struct EventPublisher {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    media: Arc<dyn BlobUploader>,
    clock: Arc<dyn Clock>,
}

impl EventPublisher {
    /// Create a new publisher
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        media: Arc<dyn BlobUploader>,
    ) -> Self {
        Self { store, auth, media, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used to name uploaded images
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Publish a new event owned by the signed-in user.
    ///
    /// The store id is reserved first so the image can be uploaded under
    /// `event_images/{id}/`; the record is only written once the upload has
    /// produced a URL.
    ///
    /// # Errors
    /// - `PeekError::Unauthenticated` when nobody is signed in
    /// - `PeekError::InvalidInput` for blank fields or an empty image
    /// - `PeekError::UploadFailed` when the image cannot be stored
    /// - `PeekError::WriteFailed` when the record cannot be written
    pub async fn create_event(&self, draft: EventDraft, image: ImageUpload) -> Result<EventRecord> {
        let creator_id = self.auth.current_user_id().ok_or(PeekError::Unauthenticated)?;
        let draft = draft.validate()?;
        if image.bytes.is_empty() {
            return Err(PeekError::InvalidInput("an event image is required".into()));
        }

        let event_id = self.store.generate_id(EVENTS_COLLECTION)?;
        let path = format!(
            "{EVENT_IMAGES_PREFIX}/{event_id}/{}.{}",
            self.clock.now().timestamp_millis(),
            image.extension()
        );

        let image_url = self.media.upload(&path, &image).await.map_err(|err| {
            warn!(event_id = %event_id, path = %path, error = %err, "event image upload failed");
            match err {
                PeekError::UploadFailed(_) => err,
                other => PeekError::UploadFailed(other.to_string()),
            }
        })?;

        let record = EventRecord::create(event_id.clone(), draft, creator_id, Some(image_url));
        self.store
            .set(EVENTS_COLLECTION, &event_id, encode_event(&record)?)
            .await
            .map_err(PeekError::into_write_failed)?;

        info!(event_id = %event_id, category = %record.category, "event created");
        Ok(record)
    }

    /// Apply an edit to the stored event, re-reading it first so attendance
    /// changes made meanwhile are kept.
    ///
    /// # Errors
    /// - `PeekError::InvalidInput` when a required field is blank
    /// - `PeekError::NotFound` when the event is gone
    /// - `PeekError::ReadFailed` / `PeekError::WriteFailed` for store failures
    pub async fn update_event(&self, event_id: &str, edit: EventEdit) -> Result<EventRecord> {
        let edit = edit.validate()?;

        let value = self
            .store
            .get(EVENTS_COLLECTION, event_id)
            .await
            .map_err(PeekError::into_read_failed)?
            .ok_or_else(|| PeekError::NotFound(format!("event {event_id}")))?;
        let mut record = decode_event(event_id, value)?;

        record.apply_edit(edit);
        self.store
            .set(EVENTS_COLLECTION, event_id, encode_event(&record)?)
            .await
            .map_err(PeekError::into_write_failed)?;

        info!(event_id, "event updated");
        Ok(record)
    }
}
