//! Process-wide sign-in state.

use parking_lot::RwLock;
use peek_core::AuthProvider;
use peek_domain::{PeekError, Result};
use tracing::info;

/// Holds the id of the signed-in user, if any
#[derive(Debug, Default)]
pub struct SessionAuth {
    user_id: RwLock<Option<String>>,
}

impl SessionAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user_id`, replacing any previous one.
    ///
    /// # Errors
    /// Returns `PeekError::InvalidInput` for a blank id.
    pub fn sign_in(&self, user_id: impl Into<String>) -> Result<()> {
        let user_id = user_id.into();
        let trimmed = user_id.trim();
        if trimmed.is_empty() {
            return Err(PeekError::InvalidInput("user id must not be blank".into()));
        }

        info!(user_id = %trimmed, "signed in");
        *self.user_id.write() = Some(trimmed.to_string());
        Ok(())
    }

    pub fn sign_out(&self) {
        if let Some(user_id) = self.user_id.write().take() {
            info!(user_id = %user_id, "signed out");
        }
    }
}

impl AuthProvider for SessionAuth {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.read().clone()
    }
}
