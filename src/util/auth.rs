//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected sections must apply identical gating: wait while the session is
//! being restored, bounce anonymous visitors to `/login`, render otherwise.
//! The decision is role-agnostic; role checks live in the section layouts.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use super::navigation::LOGIN_ROUTE;
use crate::state::auth::AuthState;

/// What a protected subtree should do for the current auth state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Restore still running: show a neutral placeholder, never redirect.
    Loading,
    RedirectToLogin,
    Render,
}

pub fn guard_decision(state: &AuthState) -> GuardDecision {
    if state.loading {
        GuardDecision::Loading
    } else if state.session.is_none() {
        GuardDecision::RedirectToLogin
    } else {
        GuardDecision::Render
    }
}

pub fn should_redirect_unauth(state: &AuthState) -> bool {
    guard_decision(state) == GuardDecision::RedirectToLogin
}

/// Redirect to `/login` whenever auth has loaded and no session is present.
///
/// The attempted destination is dropped and the history entry replaced.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate(LOGIN_ROUTE, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
