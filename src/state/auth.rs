//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. Only `SessionStore` produces new values;
//! the root component mirrors them into an `RwSignal<AuthState>` context.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Role, Session, User};

/// Who is signed in, and whether startup restore is still running.
///
/// `user` always equals `session.user`; it is kept alongside so components can
/// read identity without unpacking the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub user: Option<User>,
    /// True only between app start and the end of `SessionStore::restore`.
    pub loading: bool,
}

impl AuthState {
    /// Initial state at app start.
    pub fn restoring() -> Self {
        Self { session: None, user: None, loading: true }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self { user: Some(session.user.clone()), session: Some(session), loading: false }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<&Role> {
        self.user.as_ref().map(|u| &u.role)
    }

    /// Drop session and user, leaving `loading` untouched.
    pub(crate) fn clear_session(&mut self) {
        self.session = None;
        self.user = None;
    }
}
