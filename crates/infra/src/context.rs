//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use peek_core::{DocumentStore, EventCatalog, EventPublisher, ProfileService, RsvpService};
use peek_domain::{Config, PeekError, Result, StoreBackend, StoreConfig};
use tracing::{debug, info};

use crate::auth::SessionAuth;
use crate::media::LocalBlobStore;
use crate::observability::init_tracing;
use crate::store::{MemoryDocumentStore, SqliteDocumentStore};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<SessionAuth>,
    pub media: Arc<LocalBlobStore>,
    pub catalog: Arc<EventCatalog>,
    pub rsvp: Arc<RsvpService>,
    pub publisher: Arc<EventPublisher>,
    pub profile: Arc<ProfileService>,
}

impl AppContext {
    /// Wire every adapter and service from `config`.
    ///
    /// # Errors
    /// - `PeekError::Config` when the SQLite backend has no path or the
    ///   media URL is invalid
    /// - `PeekError::Database` when the database cannot be opened
    pub fn new(config: Config) -> Result<Self> {
        let store = build_store(&config.store)?;
        let auth = Arc::new(SessionAuth::new());
        let media = Arc::new(LocalBlobStore::from_config(&config.media)?);

        let catalog = Arc::new(EventCatalog::new(Arc::clone(&store)));
        let rsvp = Arc::new(RsvpService::new(Arc::clone(&store), auth.clone()));
        let publisher =
            Arc::new(EventPublisher::new(Arc::clone(&store), auth.clone(), media.clone()));
        let profile = Arc::new(ProfileService::new(Arc::clone(&store), auth.clone()));

        info!(
            backend = ?config.store.backend,
            media_root = %config.media.root_dir,
            "application context ready"
        );

        Ok(Self { config, store, auth, media, catalog, rsvp, publisher, profile })
    }

    /// Load `.env`, resolve the configuration, install tracing and build the
    /// context.
    ///
    /// # Errors
    /// Anything [`crate::config::load`] or [`AppContext::new`] reports.
    pub fn bootstrap() -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            debug!(error = %err, "no .env file loaded");
        }

        let config = crate::config::load()?;
        init_tracing(&config.logging);
        Self::new(config)
    }
}

fn build_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryDocumentStore::new())),
        StoreBackend::Sqlite => {
            let path = config.path.as_deref().filter(|path| !path.trim().is_empty()).ok_or_else(
                || PeekError::Config("the sqlite backend needs store.path".to_string()),
            )?;
            Ok(Arc::new(SqliteDocumentStore::open_with_timeout(
                path,
                config.pool_size,
                Duration::from_secs(config.connection_timeout_secs),
            )?))
        }
    }
}
