//! In-process realtime document store.
//!
//! Backs the `memory` backend and tests. Collections are ordered maps, so
//! listings come back in key order, and generated ids are UUIDv7 strings so
//! that key order follows creation order.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use peek_core::{
    CollectionCallback, Document, DocumentCallback, DocumentStore, SubscriptionHandle,
};
use peek_domain::Result as DomainResult;
use serde_json::Value;
use tracing::{debug, trace};
use uuid::Uuid;

use super::watchers::WatcherRegistry;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// `DocumentStore` that keeps everything in memory
pub struct MemoryDocumentStore {
    collections: Mutex<Collections>,
    watchers: WatcherRegistry,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self { collections: Mutex::new(HashMap::new()), watchers: WatcherRegistry::new() }
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.watchers.len()
    }

    fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.lock().get(collection).and_then(|docs| docs.get(id).cloned())
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .get(collection)
            .map(|docs| {
                docs.iter().map(|(key, value)| Document::new(key.clone(), value.clone())).collect()
            })
            .unwrap_or_default()
    }

    fn notify(&self, collection: &str, id: &str) {
        self.watchers.notify(
            collection,
            id,
            || Ok(self.document(collection, id)),
            || Ok(self.snapshot(collection)),
        );
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> DomainResult<Option<Value>> {
        Ok(self.document(collection, id))
    }

    async fn list(&self, collection: &str) -> DomainResult<Vec<Document>> {
        Ok(self.snapshot(collection))
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> DomainResult<()> {
        let changed = {
            let mut collections = self.collections.lock();
            let docs = collections.entry(collection.to_string()).or_default();
            let previous = docs.insert(id.to_string(), document);
            previous.as_ref() != docs.get(id)
        };

        if changed {
            self.notify(collection, id);
        } else {
            trace!(collection, id, "document unchanged, skipping notification");
        }
        Ok(())
    }

    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        callback: DocumentCallback,
    ) -> DomainResult<SubscriptionHandle> {
        Ok(self.watchers.watch_document(collection, id, callback, || {
            Ok(self.document(collection, id))
        }))
    }

    fn subscribe_collection(
        &self,
        collection: &str,
        callback: CollectionCallback,
    ) -> DomainResult<SubscriptionHandle> {
        Ok(self.watchers.watch_collection(collection, callback, || Ok(self.snapshot(collection))))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.watchers.unwatch(handle);
    }

    fn generate_id(&self, _collection: &str) -> DomainResult<String> {
        Ok(Uuid::now_v7().to_string())
    }

    fn delete(&self, collection: &str, id: &str) {
        let removed = self.collections.lock().get_mut(collection).and_then(|docs| docs.remove(id));
        if removed.is_some() {
            debug!(collection, id, "document deleted");
            self.notify(collection, id);
        }
    }
}
