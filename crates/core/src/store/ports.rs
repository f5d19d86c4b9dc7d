//! Port interfaces for the remote keyed document store
//!
//! The store holds JSON documents grouped in collections and pushes change
//! notifications to registered callbacks. Implementations live in
//! `peek-infra`.

use std::sync::Arc;

use async_trait::async_trait;
use peek_domain::Result;
use serde_json::Value;

/// A document together with the key it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Key inside the collection
    pub key: String,
    /// Stored JSON body
    pub value: Value,
}

impl Document {
    /// Pair a body with its key.
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self { key: key.into(), value }
    }
}

/// Opaque registration returned by the subscribe calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Wrap a store-assigned registration id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id, for logging.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Receives the latest value of one document (`None` once it is gone).
pub type DocumentCallback = Arc<dyn Fn(Result<Option<Value>>) + Send + Sync>;

/// Receives every document of a collection, in key order.
pub type CollectionCallback = Arc<dyn Fn(Result<Vec<Document>>) + Send + Sync>;

/// Trait for the realtime document store holding events
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read of one document
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// One-shot read of a whole collection, ordered by key
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Replace a document (last writer wins)
    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<()>;

    /// Watch one document.
    ///
    /// The callback fires once with the current value before this returns
    /// and again after every change, until [`DocumentStore::unsubscribe`].
    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        callback: DocumentCallback,
    ) -> Result<SubscriptionHandle>;

    /// Watch a whole collection, with the same delivery rules as
    /// [`DocumentStore::subscribe`].
    fn subscribe_collection(
        &self,
        collection: &str,
        callback: CollectionCallback,
    ) -> Result<SubscriptionHandle>;

    /// Stop a subscription. Unknown or already removed handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);

    /// Reserve a fresh key in `collection`
    fn generate_id(&self, collection: &str) -> Result<String>;

    /// Best-effort removal; failures are the store's to log.
    fn delete(&self, collection: &str, id: &str);
}
