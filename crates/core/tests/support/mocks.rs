//! In-memory mocks for the core ports
//!
//! `MockDocumentStore` behaves like a tiny realtime store and also counts
//! calls, injects failures, and can hold reads at a barrier so tests can
//! force interleavings.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use peek_core::{
    AuthProvider, BlobUploader, CollectionCallback, Document, DocumentCallback, DocumentStore,
    SubscriptionHandle,
};
use peek_domain::{ImageUpload, PeekError, Result as DomainResult};
use serde_json::Value;
use tokio::sync::Barrier;

enum Watcher {
    Document { collection: String, id: String, callback: DocumentCallback },
    Collection { collection: String, callback: CollectionCallback },
}

#[derive(Default)]
pub struct MockDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    watchers: Mutex<HashMap<u64, Arc<Watcher>>>,
    next_handle: AtomicU64,
    next_id: AtomicU64,
    get_calls: AtomicUsize,
    list_calls: AtomicUsize,
    set_calls: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MockDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Put a document in place without counting a write or notifying.
    pub fn seed(&self, collection: &str, id: &str, value: Value) {
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.lock().get(collection).and_then(|docs| docs.get(id).cloned())
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.lock().len()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every `get` wait until `parties` reads are in flight.
    pub fn hold_reads_until(&self, parties: usize) {
        *self.read_barrier.lock() = Some(Arc::new(Barrier::new(parties)));
    }

    /// Push a complete collection change to watchers, as a remote write would.
    pub fn notify(&self, collection: &str, id: &str) {
        let watchers: Vec<Arc<Watcher>> = self.watchers.lock().values().cloned().collect();
        for watcher in watchers {
            match watcher.as_ref() {
                Watcher::Document { collection: c, id: i, callback } if c == collection && i == id => {
                    callback(Ok(self.document(collection, id)));
                }
                Watcher::Collection { collection: c, callback } if c == collection => {
                    callback(Ok(self.snapshot(collection)));
                }
                _ => {}
            }
        }
    }

    /// Deliver an error to every collection watcher.
    pub fn notify_error(&self, collection: &str, error: PeekError) {
        let watchers: Vec<Arc<Watcher>> = self.watchers.lock().values().cloned().collect();
        for watcher in watchers {
            if let Watcher::Collection { collection: c, callback } = watcher.as_ref() {
                if c == collection {
                    callback(Err(error.clone()));
                }
            }
        }
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .get(collection)
            .map(|docs| docs.iter().map(|(key, value)| Document::new(key.clone(), value.clone())).collect())
            .unwrap_or_default()
    }

    fn register(&self, watcher: Watcher) -> (SubscriptionHandle, Arc<Watcher>) {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst) + 1;
        let watcher = Arc::new(watcher);
        self.watchers.lock().insert(id, Arc::clone(&watcher));
        (SubscriptionHandle::new(id), watcher)
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> DomainResult<Option<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PeekError::Database("read refused".into()));
        }

        let snapshot = self.document(collection, id);
        let barrier = self.read_barrier.lock().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        Ok(snapshot)
    }

    async fn list(&self, collection: &str) -> DomainResult<Vec<Document>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PeekError::Database("read refused".into()));
        }
        Ok(self.snapshot(collection))
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> DomainResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PeekError::Database("permission denied".into()));
        }
        self.seed(collection, id, document);
        self.notify(collection, id);
        Ok(())
    }

    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        callback: DocumentCallback,
    ) -> DomainResult<SubscriptionHandle> {
        let (handle, _) = self.register(Watcher::Document {
            collection: collection.to_string(),
            id: id.to_string(),
            callback: Arc::clone(&callback),
        });
        callback(Ok(self.document(collection, id)));
        Ok(handle)
    }

    fn subscribe_collection(
        &self,
        collection: &str,
        callback: CollectionCallback,
    ) -> DomainResult<SubscriptionHandle> {
        let (handle, _) = self.register(Watcher::Collection {
            collection: collection.to_string(),
            callback: Arc::clone(&callback),
        });
        callback(Ok(self.snapshot(collection)));
        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.watchers.lock().remove(&handle.id());
    }

    fn generate_id(&self, collection: &str) -> DomainResult<String> {
        let next = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{collection}-{next:04}"))
    }

    fn delete(&self, collection: &str, id: &str) {
        self.deleted.lock().push(id.to_string());
        let removed = self.collections.lock().get_mut(collection).and_then(|docs| docs.remove(id));
        if removed.is_some() {
            self.notify(collection, id);
        }
    }
}

/// Auth provider whose signed-in user can be switched by the test.
#[derive(Default)]
pub struct StaticAuth {
    user: Mutex<Option<String>>,
}

impl StaticAuth {
    pub fn signed_in(user_id: &str) -> Arc<Self> {
        Arc::new(Self { user: Mutex::new(Some(user_id.to_string())) })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sign_out(&self) {
        *self.user.lock() = None;
    }
}

impl AuthProvider for StaticAuth {
    fn current_user_id(&self) -> Option<String> {
        self.user.lock().clone()
    }
}

/// Uploader that records every path and can be told to fail.
#[derive(Default)]
pub struct RecordingUploader {
    uploads: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingUploader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let uploader = Self::default();
        uploader.fail.store(true, Ordering::SeqCst);
        Arc::new(uploader)
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl BlobUploader for RecordingUploader {
    async fn upload(&self, path: &str, _image: &ImageUpload) -> DomainResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PeekError::Internal("bucket unavailable".into()));
        }
        self.uploads.lock().push(path.to_string());
        Ok(format!("https://cdn.test/{path}"))
    }
}
