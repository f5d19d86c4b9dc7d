//! Subscription bookkeeping shared by the document store adapters.
//!
//! Every delivery, including the initial one made while registering, runs
//! under a re-entrant delivery lock. `unwatch` takes the same lock, so once
//! it returns no callback for that handle is running or will run again.
//! Callbacks may call back into the store (and into `unwatch`) on the same
//! thread. Snapshots are loaded per target so that a callback that changes
//! the collection never leaves a later watcher with stale data.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use peek_core::{CollectionCallback, Document, DocumentCallback, SubscriptionHandle};
use peek_domain::Result;
use serde_json::Value;
use tracing::trace;

#[derive(Clone)]
enum Watcher {
    Document { collection: String, id: String, callback: DocumentCallback },
    Collection { collection: String, callback: CollectionCallback },
}

impl Watcher {
    fn observes(&self, collection: &str, id: &str) -> bool {
        match self {
            Watcher::Document { collection: c, id: i, .. } => c == collection && i == id,
            Watcher::Collection { collection: c, .. } => c == collection,
        }
    }
}

pub(crate) struct WatcherRegistry {
    entries: Mutex<BTreeMap<u64, Watcher>>,
    delivery: ReentrantMutex<()>,
    next_id: AtomicU64,
}

impl WatcherRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            delivery: ReentrantMutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a document watcher and hand it `current()` straight away.
    pub(crate) fn watch_document<F>(
        &self,
        collection: &str,
        id: &str,
        callback: DocumentCallback,
        current: F,
    ) -> SubscriptionHandle
    where
        F: FnOnce() -> Result<Option<Value>>,
    {
        let _delivery = self.delivery.lock();
        let handle = self.insert(Watcher::Document {
            collection: collection.to_string(),
            id: id.to_string(),
            callback: Arc::clone(&callback),
        });
        callback(current());
        handle
    }

    /// Register a collection watcher and hand it `current()` straight away.
    pub(crate) fn watch_collection<F>(
        &self,
        collection: &str,
        callback: CollectionCallback,
        current: F,
    ) -> SubscriptionHandle
    where
        F: FnOnce() -> Result<Vec<Document>>,
    {
        let _delivery = self.delivery.lock();
        let handle = self.insert(Watcher::Collection {
            collection: collection.to_string(),
            callback: Arc::clone(&callback),
        });
        callback(current());
        handle
    }

    /// Idempotent.
    pub(crate) fn unwatch(&self, handle: SubscriptionHandle) {
        let _delivery = self.delivery.lock();
        if self.entries.lock().remove(&handle.id()).is_some() {
            trace!(handle = handle.id(), "watcher removed");
        }
    }

    /// Tell everyone watching `collection/id` or the whole collection that it
    /// changed. `document` and `listing` load the state to deliver.
    pub(crate) fn notify<D, L>(&self, collection: &str, id: &str, document: D, listing: L)
    where
        D: Fn() -> Result<Option<Value>>,
        L: Fn() -> Result<Vec<Document>>,
    {
        let _delivery = self.delivery.lock();
        let targets: Vec<(u64, Watcher)> = self
            .entries
            .lock()
            .iter()
            .filter(|(_, watcher)| watcher.observes(collection, id))
            .map(|(key, watcher)| (*key, watcher.clone()))
            .collect();

        for (key, watcher) in targets {
            if !self.entries.lock().contains_key(&key) {
                continue;
            }
            match watcher {
                Watcher::Document { callback, .. } => callback(document()),
                Watcher::Collection { callback, .. } => callback(listing()),
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn insert(&self, watcher: Watcher) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(id, watcher);
        SubscriptionHandle::new(id)
    }
}
