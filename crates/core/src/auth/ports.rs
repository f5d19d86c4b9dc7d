//! Port interfaces for the authentication provider
//!
//! Sign-up and sign-in flows live outside the core; services only ask who
//! is signed in right now.

/// Trait for looking up the signed-in user
pub trait AuthProvider: Send + Sync {
    /// Identifier of the signed-in user, if any
    fn current_user_id(&self) -> Option<String>;
}
