//! Account details kept alongside the events

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_PHONE_LENGTH;
use crate::{PeekError, Result};

/// Compiled once at first use; `None` only if the pattern itself is broken.
static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Profile stored under `Users/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Free text entered at sign-up
    pub date_created: String,
}

impl UserProfile {
    /// Trim every field and check it the way the sign-up form does: name and
    /// date are required, the email must look like an address and the phone
    /// number needs at least ten characters.
    pub fn validate(self) -> Result<Self> {
        let profile = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date_created: self.date_created.trim().to_string(),
        };

        if profile.name.is_empty() {
            return Err(PeekError::InvalidInput("name is required".into()));
        }
        if !is_email(&profile.email) {
            return Err(PeekError::InvalidInput(format!("invalid email '{}'", profile.email)));
        }
        if profile.phone.chars().count() < MIN_PHONE_LENGTH {
            return Err(PeekError::InvalidInput("a valid phone number is required".into()));
        }
        if profile.date_created.is_empty() {
            return Err(PeekError::InvalidInput("date is required".into()));
        }

        Ok(profile)
    }
}

fn is_email(value: &str) -> bool {
    EMAIL_REGEX.as_ref().is_some_and(|pattern| pattern.is_match(value))
}
