//! Profile service - the signed-in user's account details and events

use std::sync::Arc;

use peek_domain::constants::{EVENTS_COLLECTION, USERS_COLLECTION};
use peek_domain::{PeekError, Result, UserEvents, UserProfile};
use tracing::{debug, info, warn};

use crate::auth::ports::AuthProvider;
use crate::store::{decode_event, decode_profile, encode_profile, DocumentStore};

/// Profile queries for the signed-in user
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl ProfileService {
    /// Create a new profile service
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// Store the signed-in user's profile, replacing any previous one.
    ///
    /// Returns the profile as written, with every field trimmed.
    ///
    /// # Errors
    /// - `PeekError::Unauthenticated` when nobody is signed in
    /// - `PeekError::InvalidInput` when a field fails validation
    /// - `PeekError::WriteFailed` when the store rejects the write
    pub async fn save_profile(&self, profile: UserProfile) -> Result<UserProfile> {
        let user_id = self.auth.current_user_id().ok_or(PeekError::Unauthenticated)?;
        let profile = profile.validate()?;

        self.store
            .set(USERS_COLLECTION, &user_id, encode_profile(&profile)?)
            .await
            .map_err(PeekError::into_write_failed)?;

        info!(user_id = %user_id, "profile saved");
        Ok(profile)
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    /// - `PeekError::Unauthenticated` when nobody is signed in
    /// - `PeekError::NotFound` when no profile was ever saved
    /// - `PeekError::ReadFailed` when the store or the document is unreadable
    pub async fn load_profile(&self) -> Result<UserProfile> {
        let user_id = self.auth.current_user_id().ok_or(PeekError::Unauthenticated)?;
        let value = self
            .store
            .get(USERS_COLLECTION, &user_id)
            .await
            .map_err(PeekError::into_read_failed)?
            .ok_or_else(|| PeekError::NotFound(format!("profile {user_id}")))?;

        decode_profile(&user_id, value)
    }

    /// Split the collection into events the user created and events they
    /// RSVP'd to without being the creator.
    ///
    /// # Errors
    /// - `PeekError::Unauthenticated` when nobody is signed in
    /// - `PeekError::ReadFailed` when the collection cannot be read
    pub async fn user_events(&self) -> Result<UserEvents> {
        let user_id = self.auth.current_user_id().ok_or(PeekError::Unauthenticated)?;
        let documents =
            self.store.list(EVENTS_COLLECTION).await.map_err(PeekError::into_read_failed)?;

        let mut events = UserEvents::default();
        for document in documents {
            let record = match decode_event(&document.key, document.value) {
                Ok(record) => record,
                Err(err) => {
                    warn!(event_id = %document.key, error = %err, "skipping undecodable event");
                    continue;
                }
            };

            if record.is_created_by(&user_id) {
                events.created.push(record);
            } else if record.is_attending(&user_id) {
                events.attending.push(record);
            }
        }

        debug!(created = events.created.len(), attending = events.attending.len(), "profile events loaded");
        Ok(events)
    }
}
