//! Shared fixtures and document store contract checks.
//!
//! Both store adapters run the same checks so they stay interchangeable
//! behind `DocumentStore`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use peek_core::{CollectionCallback, Document, DocumentCallback, DocumentStore};
use peek_domain::Result;
use peek_infra::{DbManager, SqliteDocumentStore};
use serde_json::{json, Value};
use tempfile::TempDir;

pub type Seen<T> = Arc<Mutex<Vec<T>>>;

/// Temporary SQLite database that lives as long as the value.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::open(temp_dir.path().join("peek.db"), 4)
            .expect("db manager should be created");
        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn store(&self) -> Arc<SqliteDocumentStore> {
        Arc::new(SqliteDocumentStore::new(Arc::clone(&self.manager)))
    }
}

pub fn document_recorder() -> (Seen<Option<Value>>, DocumentCallback) {
    let seen: Seen<Option<Value>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: DocumentCallback = Arc::new(move |value: Result<Option<Value>>| {
        sink.lock().push(value.expect("store delivered an error"));
    });
    (seen, callback)
}

/// Records the keys of every delivered collection snapshot.
pub fn collection_recorder() -> (Seen<Vec<String>>, CollectionCallback) {
    let seen: Seen<Vec<String>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: CollectionCallback = Arc::new(move |documents: Result<Vec<Document>>| {
        let keys = documents.expect("store delivered an error").into_iter().map(|doc| doc.key).collect();
        sink.lock().push(keys);
    });
    (seen, callback)
}

/// Poll `check` until it holds; deletes may complete in the background.
pub async fn eventually<F: Fn() -> bool>(what: &str, check: F) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}

pub async fn check_read_write(store: Arc<dyn DocumentStore>) {
    assert_eq!(store.get("events", "missing").await.unwrap(), None);
    assert!(store.list("events").await.unwrap().is_empty());

    store.set("events", "b", json!({ "title": "B" })).await.unwrap();
    store.set("events", "a", json!({ "title": "A", "rsvpList": { "u1": true } })).await.unwrap();
    store.set("other", "z", json!({ "title": "Z" })).await.unwrap();

    assert_eq!(
        store.get("events", "a").await.unwrap(),
        Some(json!({ "title": "A", "rsvpList": { "u1": true } }))
    );
    let keys: Vec<String> = store.list("events").await.unwrap().into_iter().map(|doc| doc.key).collect();
    assert_eq!(keys, vec!["a", "b"]);

    store.set("events", "b", json!({ "title": "B2" })).await.unwrap();
    assert_eq!(store.get("events", "b").await.unwrap(), Some(json!({ "title": "B2" })));

    let first = store.generate_id("events").unwrap();
    let second = store.generate_id("events").unwrap();
    assert_ne!(first, second);
    assert!(first < second, "ids should sort in creation order");
}

pub async fn check_document_subscription(store: Arc<dyn DocumentStore>) {
    store.set("events", "e1", json!({ "n": 1 })).await.unwrap();
    let (seen, callback) = document_recorder();

    let handle = store.subscribe("events", "e1", callback).unwrap();
    assert_eq!(*seen.lock(), vec![Some(json!({ "n": 1 }))]);

    store.set("events", "e1", json!({ "n": 1 })).await.unwrap();
    assert_eq!(seen.lock().len(), 1, "unchanged writes are not delivered");

    store.set("events", "e1", json!({ "n": 2 })).await.unwrap();
    store.set("events", "e2", json!({ "n": 9 })).await.unwrap();
    assert_eq!(*seen.lock(), vec![Some(json!({ "n": 1 })), Some(json!({ "n": 2 }))]);

    store.delete("events", "e1");
    eventually("delete notification", || seen.lock().len() == 3).await;
    assert_eq!(seen.lock().last(), Some(&None));

    store.unsubscribe(handle);
    store.unsubscribe(handle);
    store.set("events", "e1", json!({ "n": 3 })).await.unwrap();
    assert_eq!(seen.lock().len(), 3);
}

pub async fn check_collection_subscription(store: Arc<dyn DocumentStore>) {
    store.set("events", "a", json!({ "n": 1 })).await.unwrap();
    let (seen, callback) = collection_recorder();

    let handle = store.subscribe_collection("events", callback).unwrap();
    assert_eq!(*seen.lock(), vec![vec!["a".to_string()]]);

    store.set("events", "b", json!({ "n": 2 })).await.unwrap();
    store.set("other", "x", json!({ "n": 3 })).await.unwrap();
    assert_eq!(seen.lock().last(), Some(&vec!["a".to_string(), "b".to_string()]));
    assert_eq!(seen.lock().len(), 2);

    store.delete("events", "a");
    eventually("collection shrinks", || seen.lock().last() == Some(&vec!["b".to_string()])).await;

    store.delete("events", "never-existed");
    store.unsubscribe(handle);
    store.set("events", "c", json!({ "n": 4 })).await.unwrap();
    assert_eq!(seen.lock().len(), 3);
}
