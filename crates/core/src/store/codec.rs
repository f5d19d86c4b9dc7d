//! Mapping between stored JSON documents and domain records

use peek_domain::{EventRecord, PeekError, Result, UserProfile};
use serde_json::Value;

/// Decode an event document stored under `key`.
///
/// The store key is authoritative: a record written without an id gets it
/// from the key.
///
/// # Errors
/// Returns `PeekError::ReadFailed` when the document is not an event.
pub fn decode_event(key: &str, value: Value) -> Result<EventRecord> {
    let mut record: EventRecord = serde_json::from_value(value)
        .map_err(|err| PeekError::ReadFailed(format!("malformed event document '{key}': {err}")))?;
    record.assign_id_if_missing(key);
    Ok(record)
}

/// Encode a record into its persisted layout.
///
/// # Errors
/// Returns `PeekError::Internal` if serialization fails.
pub fn encode_event(record: &EventRecord) -> Result<Value> {
    serde_json::to_value(record)
        .map_err(|err| PeekError::Internal(format!("failed to encode event {}: {err}", record.id())))
}

/// Decode the profile stored for `user_id`.
///
/// # Errors
/// Returns `PeekError::ReadFailed` when the document is not a profile.
pub fn decode_profile(user_id: &str, value: Value) -> Result<UserProfile> {
    serde_json::from_value(value)
        .map_err(|err| PeekError::ReadFailed(format!("malformed profile for '{user_id}': {err}")))
}

/// Encode a profile into its persisted layout.
///
/// # Errors
/// Returns `PeekError::Internal` if serialization fails.
pub fn encode_profile(profile: &UserProfile) -> Result<Value> {
    serde_json::to_value(profile).map_err(|err| PeekError::Internal(format!("failed to encode profile: {err}")))
}
