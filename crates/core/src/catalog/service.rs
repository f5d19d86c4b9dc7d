//! Event catalog service - core business logic
//!
//! Serves the events that are still relevant today. Events dated before the
//! start of the current local day are hidden and removed from the store on a
//! best-effort basis; events whose date cannot be parsed stay visible.

use std::sync::{Arc, Weak};

use chrono::NaiveDate;
use peek_domain::constants::EVENTS_COLLECTION;
use peek_domain::{EventRecord, PeekError, Result};
use tracing::{debug, info, warn};

use super::filter::filter_events;
use crate::store::{decode_event, CollectionCallback, Document, DocumentStore, SubscriptionHandle};
use crate::utils::clock::{Clock, SystemClock};

/// Listing service over the `events` collection
pub struct EventCatalog {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

/// Outcome of checking a collection snapshot against today's date.
#[derive(Debug, Default)]
struct Sweep {
    current: Vec<EventRecord>,
    expired: Vec<String>,
}

impl EventCatalog {
    /// Create a catalog that uses the system clock
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock that defines "today"
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// One-shot load of every current event, in store key order.
    ///
    /// Past events are left out and a delete is requested for each of them.
    ///
    /// # Errors
    /// Returns `PeekError::ReadFailed` when the collection cannot be read.
    pub async fn load_once(&self) -> Result<Vec<EventRecord>> {
        let documents =
            self.store.list(EVENTS_COLLECTION).await.map_err(PeekError::into_read_failed)?;

        let sweep = sweep(documents, self.clock.today());
        retire(self.store.as_ref(), &sweep.expired);

        debug!(events = sweep.current.len(), retired = sweep.expired.len(), "catalog loaded");
        Ok(sweep.current)
    }

    /// Continuous variant of [`EventCatalog::load_once`].
    ///
    /// `on_change` receives the full current list immediately and after every
    /// change to the collection. Store errors after registration are logged
    /// and otherwise ignored.
    ///
    /// # Errors
    /// Returns whatever the store reports while registering.
    pub fn subscribe<F>(&self, on_change: F) -> Result<SubscriptionHandle>
    where
        F: Fn(Vec<EventRecord>) + Send + Sync + 'static,
    {
        let store: Weak<dyn DocumentStore> = Arc::downgrade(&self.store);
        let clock = Arc::clone(&self.clock);

        let callback: CollectionCallback =
            Arc::new(move |snapshot: Result<Vec<Document>>| match snapshot {
                Ok(documents) => {
                    let sweep = sweep(documents, clock.today());
                    on_change(sweep.current);
                    if let Some(store) = store.upgrade() {
                        retire(store.as_ref(), &sweep.expired);
                    }
                }
                Err(err) => warn!(error = %err, kind = err.label(), "catalog subscription error"),
            });

        let handle = self.store.subscribe_collection(EVENTS_COLLECTION, callback)?;
        debug!(handle = handle.id(), "catalog subscription registered");
        Ok(handle)
    }

    /// Stop a catalog subscription. Safe to call more than once.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.store.unsubscribe(handle);
    }

    /// Fetch a single event by id, for detail and edit screens.
    ///
    /// # Errors
    /// - `PeekError::NotFound` when the event does not exist
    /// - `PeekError::ReadFailed` when it cannot be read or decoded
    pub async fn load_event(&self, event_id: &str) -> Result<EventRecord> {
        let value = self
            .store
            .get(EVENTS_COLLECTION, event_id)
            .await
            .map_err(PeekError::into_read_failed)?
            .ok_or_else(|| PeekError::NotFound(format!("event {event_id}")))?;
        decode_event(event_id, value)
    }

    /// Filter a snapshot by category and search text.
    ///
    /// Pure; see [`crate::catalog::EventFilter`] for the matching rules.
    pub fn filter(records: &[EventRecord], category: &str, search_text: &str) -> Vec<EventRecord> {
        filter_events(records, category, search_text)
    }
}

fn sweep(documents: Vec<Document>, today: NaiveDate) -> Sweep {
    let mut sweep = Sweep::default();

    for Document { key, value } in documents {
        let record = match decode_event(&key, value) {
            Ok(record) => record,
            Err(err) => {
                warn!(event_id = %key, error = %err, "skipping undecodable event");
                continue;
            }
        };

        match record.event_date() {
            Ok(date) if date < today => sweep.expired.push(key),
            Ok(_) => sweep.current.push(record),
            Err(err) => {
                debug!(event_id = %key, error = %err, "keeping event with unparseable date");
                sweep.current.push(record);
            }
        }
    }

    sweep
}

fn retire(store: &dyn DocumentStore, expired: &[String]) {
    for event_id in expired {
        info!(event_id = %event_id, "removing past event");
        store.delete(EVENTS_COLLECTION, event_id);
    }
}
