//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Peek
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PeekError {
    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PeekError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound(_) => "not_found",
            Self::WriteFailed(_) => "write_failed",
            Self::ReadFailed(_) => "read_failed",
            Self::ParseFailed(_) => "parse_failed",
            Self::InvalidInput(_) => "invalid_input",
            Self::UploadFailed(_) => "upload_failed",
            Self::Config(_) => "config",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }

    /// Re-tag a store failure as a failed read, keeping errors that already
    /// carry a more specific meaning.
    pub fn into_read_failed(self) -> Self {
        match self {
            Self::Unauthenticated | Self::NotFound(_) | Self::ReadFailed(_) => self,
            other => Self::ReadFailed(other.to_string()),
        }
    }

    /// Re-tag a store failure as a failed write.
    pub fn into_write_failed(self) -> Self {
        match self {
            Self::Unauthenticated | Self::WriteFailed(_) => self,
            other => Self::WriteFailed(other.to_string()),
        }
    }
}

/// Result type alias for Peek operations
pub type Result<T> = std::result::Result<T, PeekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failed_keeps_specific_variants() {
        assert_eq!(PeekError::NotFound("e1".into()).into_read_failed(), PeekError::NotFound("e1".into()));
        assert_eq!(
            PeekError::Database("busy".into()).into_read_failed(),
            PeekError::ReadFailed("Database error: busy".into())
        );
    }

    #[test]
    fn write_failed_wraps_cause() {
        let err = PeekError::Internal("connection reset".into()).into_write_failed();
        assert_eq!(err, PeekError::WriteFailed("Internal error: connection reset".into()));
        assert_eq!(err.label(), "write_failed");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(PeekError::NotFound("e1".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "NotFound", "message": "e1" }));
    }
}
