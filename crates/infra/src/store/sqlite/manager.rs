//! SQLite connection manager backed by an r2d2 pool.

use std::path::{Path, PathBuf};
use std::time::Duration;

use peek_domain::{PeekError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled SQLite connection
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database manager that wraps the connection pool.
pub struct DbManager {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl DbManager {
    /// Open (creating if needed) the database file with `pool_size`
    /// connections and apply the schema.
    pub fn open<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        Self::open_with_timeout(db_path, pool_size, DEFAULT_CONNECTION_TIMEOUT)
    }

    /// Like [`DbManager::open`], failing once a connection cannot be
    /// established within `connection_timeout`.
    pub fn open_with_timeout<P: AsRef<Path>>(
        db_path: P,
        pool_size: u32,
        connection_timeout: Duration,
    ) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
        });

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(connection_timeout)
            .build(manager)
            .map_err(|err| PeekError::from(InfraError::from(err)))?;

        let manager = Self { pool, path };
        manager.run_migrations()?;

        info!(
            db_path = %manager.path.display(),
            max_connections = manager.pool.max_size(),
            "sqlite pool initialised"
        );
        Ok(manager)
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool.get().map_err(|err| PeekError::from(InfraError::from(err)))
    }

    /// Ensure the schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the database is accessible and responding.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> PeekError {
    PeekError::from(InfraError::from(err))
}
