//! `DocumentStore` over a single `documents` table.
//!
//! Each document is one JSON row keyed by `(collection, id)`. Async calls run
//! on tokio's blocking pool. `subscribe`, `subscribe_collection` and
//! `delete` are synchronous in the port: the first two read the initial
//! value inline and hand a failed read to the callback as its first
//! delivery, `delete` hands its work to the blocking pool when a runtime
//! is available and runs inline otherwise.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use peek_core::{
    CollectionCallback, Document, DocumentCallback, DocumentStore, SubscriptionHandle,
};
use peek_domain::{PeekError, Result as DomainResult};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::manager::{map_sql_error, DbManager};
use crate::errors::{map_join_error, InfraError};
use crate::store::watchers::WatcherRegistry;

/// SQLite implementation of `DocumentStore`
pub struct SqliteDocumentStore {
    db: Arc<DbManager>,
    watchers: Arc<WatcherRegistry>,
}

impl SqliteDocumentStore {
    /// Create a store on top of an existing manager
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db, watchers: Arc::new(WatcherRegistry::new()) }
    }

    /// Open the database file and create a store on it
    pub fn open<P: AsRef<Path>>(path: P, pool_size: u32) -> DomainResult<Self> {
        Ok(Self::new(Arc::new(DbManager::open(path, pool_size)?)))
    }

    /// Open with an explicit pool connection timeout
    pub fn open_with_timeout<P: AsRef<Path>>(
        path: P,
        pool_size: u32,
        connection_timeout: Duration,
    ) -> DomainResult<Self> {
        Ok(Self::new(Arc::new(DbManager::open_with_timeout(path, pool_size, connection_timeout)?)))
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.watchers.len()
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> DomainResult<Option<Value>> {
        let db = Arc::clone(&self.db);
        let collection = collection.to_string();
        let id = id.to_string();

        task::spawn_blocking(move || read_document(&db, &collection, &id))
            .await
            .map_err(map_join_error)?
    }

    async fn list(&self, collection: &str) -> DomainResult<Vec<Document>> {
        let db = Arc::clone(&self.db);
        let collection = collection.to_string();

        task::spawn_blocking(move || read_collection(&db, &collection))
            .await
            .map_err(map_join_error)?
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let watchers = Arc::clone(&self.watchers);
        let collection = collection.to_string();
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            if write_document(&db, &collection, &id, &document)? {
                notify(&db, &watchers, &collection, &id);
            } else {
                trace!(collection = %collection, id = %id, "document unchanged, skipping notification");
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        callback: DocumentCallback,
    ) -> DomainResult<SubscriptionHandle> {
        Ok(self.watchers.watch_document(collection, id, callback, || {
            read_document(&self.db, collection, id)
        }))
    }

    fn subscribe_collection(
        &self,
        collection: &str,
        callback: CollectionCallback,
    ) -> DomainResult<SubscriptionHandle> {
        Ok(self
            .watchers
            .watch_collection(collection, callback, || read_collection(&self.db, collection)))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.watchers.unwatch(handle);
    }

    fn generate_id(&self, _collection: &str) -> DomainResult<String> {
        Ok(Uuid::now_v7().to_string())
    }

    fn delete(&self, collection: &str, id: &str) {
        let db = Arc::clone(&self.db);
        let watchers = Arc::clone(&self.watchers);
        let collection = collection.to_string();
        let id = id.to_string();

        let job = move || match remove_document(&db, &collection, &id) {
            Ok(true) => {
                debug!(collection = %collection, id = %id, "document deleted");
                notify(&db, &watchers, &collection, &id);
            }
            Ok(false) => trace!(collection = %collection, id = %id, "nothing to delete"),
            Err(err) => {
                warn!(collection = %collection, id = %id, error = %err, "delete failed");
            }
        };

        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(job);
            }
            Err(_) => job(),
        }
    }
}

fn read_document(db: &DbManager, collection: &str, id: &str) -> DomainResult<Option<Value>> {
    let conn = db.get_connection()?;
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()
        .map_err(map_sql_error)?;

    body.map(|body| parse_body(&body)).transpose()
}

/// Every readable document in `collection`, in key order. Rows whose body
/// is not valid JSON are skipped so one bad row cannot hide the rest.
fn read_collection(db: &DbManager, collection: &str) -> DomainResult<Vec<Document>> {
    let conn = db.get_connection()?;
    let mut stmt = conn
        .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")
        .map_err(map_sql_error)?;

    let rows = stmt
        .query_map(params![collection], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(map_sql_error)?;

    let mut documents = Vec::new();
    for row in rows {
        let (id, body) = row.map_err(map_sql_error)?;
        match parse_body(&body) {
            Ok(value) => documents.push(Document::new(id, value)),
            Err(err) => {
                warn!(collection = %collection, id = %id, error = %err, "skipping unreadable document");
            }
        }
    }
    Ok(documents)
}

/// Upsert the document. Returns `false` when the stored body was already
/// identical.
fn write_document(db: &DbManager, collection: &str, id: &str, document: &Value) -> DomainResult<bool> {
    let body = serde_json::to_string(document).map_err(|err| PeekError::from(InfraError::from(err)))?;
    let conn = db.get_connection()?;

    let changed = conn
        .execute(
            "INSERT INTO documents (collection, id, body, updated_at)
             VALUES (?1, ?2, ?3, CAST(strftime('%s','now') AS INTEGER))
             ON CONFLICT (collection, id) DO UPDATE
                 SET body = excluded.body, updated_at = excluded.updated_at
                 WHERE documents.body <> excluded.body",
            params![collection, id, body],
        )
        .map_err(map_sql_error)?;

    Ok(changed > 0)
}

fn remove_document(db: &DbManager, collection: &str, id: &str) -> DomainResult<bool> {
    let conn = db.get_connection()?;
    let removed = conn
        .execute("DELETE FROM documents WHERE collection = ?1 AND id = ?2", params![collection, id])
        .map_err(map_sql_error)?;
    Ok(removed > 0)
}

fn notify(db: &DbManager, watchers: &WatcherRegistry, collection: &str, id: &str) {
    watchers.notify(
        collection,
        id,
        || read_document(db, collection, id),
        || read_collection(db, collection),
    );
}

fn parse_body(body: &str) -> DomainResult<Value> {
    serde_json::from_str(body).map_err(|err| PeekError::from(InfraError::from(err)))
}
