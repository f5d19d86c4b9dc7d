//! Input values for creating and editing events

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_IMAGE_EXTENSION;
use crate::{PeekError, Result};

/// Fields submitted by the event creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub zone_label: String,
}

impl EventDraft {
    /// Trim every field and reject the draft if any of them is empty.
    pub fn validate(self) -> Result<Self> {
        let draft = Self {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
            zone_label: self.zone_label.trim().to_string(),
        };

        let fields = [
            &draft.title,
            &draft.category,
            &draft.description,
            &draft.date,
            &draft.time,
            &draft.location,
            &draft.zone_label,
        ];
        if fields.iter().any(|field| field.is_empty()) {
            return Err(PeekError::InvalidInput("all event fields are required".into()));
        }

        Ok(draft)
    }
}

/// Fields the creator may change after publishing.
///
/// Identity, creator, attendance and image are not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEdit {
    pub title: String,
    pub category: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub zone_label: String,
}

impl EventEdit {
    /// Trim every field; title, date, time and location are required.
    pub fn validate(self) -> Result<Self> {
        let edit = Self {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
            zone_label: self.zone_label.trim().to_string(),
        };

        if edit.title.is_empty() || edit.date.is_empty() || edit.time.is_empty() || edit.location.is_empty()
        {
            return Err(PeekError::InvalidInput(
                "title, date, time and location are required".into(),
            ));
        }

        Ok(edit)
    }
}

/// A picked image waiting to be uploaded alongside a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Name reported by the picker
    pub file_name: String,
    /// MIME type, when known
    pub content_type: Option<String>,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Picked file with its reported content type.
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), content_type, bytes }
    }

    /// File extension for the stored blob.
    ///
    /// The content type wins, then the file name's extension, then `jpg`.
    pub fn extension(&self) -> String {
        if let Some(ext) = self.content_type.as_deref().and_then(extension_for_mime) {
            return ext.to_string();
        }

        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
            _ => DEFAULT_IMAGE_EXTENSION.to_string(),
        }
    }
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
