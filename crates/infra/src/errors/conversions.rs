//! Conversions from external infrastructure errors into domain errors.

use peek_domain::PeekError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PeekError);

impl From<InfraError> for PeekError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PeekError> for InfraError {
    fn from(value: PeekError) -> Self {
        InfraError(value)
    }
}

trait IntoPeekError {
    fn into_peek(self) -> PeekError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PeekError */
/* -------------------------------------------------------------------------- */

impl IntoPeekError for SqlError {
    fn into_peek(self) -> PeekError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => PeekError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => PeekError::Database("database is locked".into()),
                    ErrorCode::ReadOnly => PeekError::Database("database is read-only".into()),
                    ErrorCode::CannotOpen => {
                        PeekError::Database(format!("unable to open database: {message}"))
                    }
                    _ => PeekError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => PeekError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                PeekError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PeekError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => {
                PeekError::Config(format!("invalid database path: {}", path.to_string_lossy()))
            }
            other => PeekError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_peek())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PeekError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(PeekError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PeekError */
/* -------------------------------------------------------------------------- */

impl IntoPeekError for serde_json::Error {
    fn into_peek(self) -> PeekError {
        use serde_json::error::Category;

        match self.classify() {
            Category::Io => PeekError::Database(format!("document I/O error: {self}")),
            Category::Syntax | Category::Data | Category::Eof => {
                PeekError::ParseFailed(format!("stored document is not valid JSON: {self}"))
            }
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_peek())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → PeekError */
/* -------------------------------------------------------------------------- */

impl IntoPeekError for std::io::Error {
    fn into_peek(self) -> PeekError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => PeekError::NotFound(self.to_string()),
            ErrorKind::PermissionDenied => PeekError::UploadFailed(format!("permission denied: {self}")),
            _ => PeekError::UploadFailed(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_peek())
    }
}

/// Map a failed `spawn_blocking` join into a domain error.
pub fn map_join_error(err: JoinError) -> PeekError {
    if err.is_cancelled() {
        PeekError::Internal("blocking task cancelled".into())
    } else {
        PeekError::Internal(format!("blocking task panicked: {err}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
