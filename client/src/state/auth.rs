//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering. The token mirrors to
//! localStorage so a reload stays signed in until the server-side expiry.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use shared::User;

/// Authentication state tracking the current user, token, and loading status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
}

impl AuthState {
    /// State while the stored token is being revalidated against the server.
    #[must_use]
    pub fn checking(token: Option<String>) -> Self {
        Self { user: None, token, loading: true }
    }

    /// Record a successful login or token revalidation.
    pub fn signed_in(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.loading = false;
    }

    /// Drop all session state.
    pub fn signed_out(&mut self) {
        *self = Self::default();
    }

    /// True once loading settled with a user present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}
