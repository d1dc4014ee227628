//! The session store: the only writer of [`AuthState`].
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once by the root component and provided through context. Components
//! observe it through the `RwSignal<AuthState>` mirror; page code calls
//! `sign_in` / `sign_out` on it directly.
//!
//! DESIGN
//! ======
//! Sign-in is a two-step protocol. The backend confirms identity and issues
//! tokens, then the auth provider installs them as the persistent browser
//! session. Either step failing runs `sign_out` as the compensating action,
//! so the store is never left half signed in.
//!
//! `loading` belongs to startup restore alone. It starts `true`, `restore`
//! clears it exactly once, and no other operation touches it. Once a sign-in
//! or sign-out has run, restore is superseded: it still clears `loading` but
//! discards whatever it loaded and leaves the persisted record matching the
//! in-memory session.
//!
//! Locks guard plain data only and are never held across an `.await`.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::auth::AuthState;
use crate::config::ClientConfig;
use crate::net::auth_backend::AuthBackend;
use crate::net::auth_provider::AuthProvider;
use crate::net::error::AuthError;
use crate::net::transport::{FetchTransport, Transport};
use crate::net::types::{Credentials, Session, User};
use crate::util::clock::now_unix_secs;
use crate::util::storage::{KeyValueStore, LocalStorage};

/// The store as wired in the browser.
pub type BrowserSessionStore = SessionStore<FetchTransport, LocalStorage>;

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

struct Inner<T, S> {
    backend: AuthBackend<T>,
    provider: AuthProvider<T, S>,
    state: RwLock<AuthState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_listener: AtomicU64,
    restore_started: AtomicBool,
    restore_superseded: AtomicBool,
}

/// Shared handle to the session state. Clones refer to the same store.
pub struct SessionStore<T, S> {
    inner: Arc<Inner<T, S>>,
}

impl<T, S> Clone for SessionStore<T, S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Transport, S: KeyValueStore> SessionStore<T, S> {
    pub fn new(config: &ClientConfig, transport: T, storage: S) -> Self {
        Self::from_parts(
            AuthBackend::new(&config.api_base_url, transport.clone()),
            AuthProvider::new(config.auth_provider.clone(), transport, storage),
        )
    }

    pub fn from_parts(backend: AuthBackend<T>, provider: AuthProvider<T, S>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                provider,
                state: RwLock::new(AuthState::restoring()),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                restore_started: AtomicBool::new(false),
                restore_superseded: AtomicBool::new(false),
            }),
        }
    }

    /// The auth provider client, for registration and verification flows.
    pub fn provider(&self) -> &AuthProvider<T, S> {
        &self.inner.provider
    }

    pub fn snapshot(&self) -> AuthState {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Register `listener` for state changes. It is called once right away
    /// with the current state.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        let listener: Listener = Arc::new(listener);
        self.listeners().push((id, Arc::clone(&listener)));
        listener(&self.snapshot());
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners().retain(|(existing, _)| *existing != id);
    }

    /// Restore the persisted session at startup.
    ///
    /// Runs once per store; later calls return immediately. Never fails:
    /// anything short of a usable session ends anonymous. Always leaves
    /// `loading == false`.
    pub async fn restore(&self) {
        if self.inner.restore_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let restored = self.load_usable_session().await;
        if self.is_restore_superseded() {
            if restored.is_some() {
                self.resync_persisted();
            }
            self.update(|state| state.loading = false);
            return;
        }
        self.update(|state| *state = restored.map_or_else(AuthState::anonymous, AuthState::signed_in));
    }

    fn is_restore_superseded(&self) -> bool {
        self.inner.restore_superseded.load(Ordering::SeqCst)
    }

    /// Point the persisted record back at the in-memory session after a
    /// superseded restore may have rewritten it.
    fn resync_persisted(&self) {
        let provider = &self.inner.provider;
        match self.snapshot().session {
            Some(session) => {
                if let Err(e) = provider.persist(&session) {
                    leptos::logging::warn!("could not re-persist session: {e}");
                }
            }
            None => provider.forget(),
        }
    }

    async fn load_usable_session(&self) -> Option<Session> {
        let provider = &self.inner.provider;
        let session = match provider.load_persisted() {
            Ok(Some(session)) => session,
            Ok(None) => return None,
            Err(e) => {
                leptos::logging::warn!("discarding unreadable session record: {e}");
                return None;
            }
        };
        let now = now_unix_secs();
        if !session.is_expired(now) {
            return Some(session);
        }
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            provider.forget();
            return None;
        };
        match provider.refresh(refresh_token, now).await {
            Ok(refreshed) => Some(refreshed),
            Err(e) => {
                leptos::logging::warn!("session refresh failed: {e}");
                provider.forget();
                None
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection, a network/decode failure, or
    /// [`AuthError::SessionSync`] when the backend accepted the credentials
    /// but the local session could not be installed. In every error case the
    /// store has been signed out.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = Credentials::new(email, password);
        let grant = match self.inner.backend.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => return Err(self.abort_sign_in(e).await),
        };
        let session = Session::from_login(grant, now_unix_secs());
        if let Err(e) = self.inner.provider.install(&session).await {
            return Err(self.abort_sign_in(AuthError::from(e)).await);
        }
        let user = session.user.clone();
        leptos::logging::log!("signed in as {} ({})", user.email, user.role.as_str());
        self.inner.restore_superseded.store(true, Ordering::SeqCst);
        self.update(|state| {
            state.user = Some(session.user.clone());
            state.session = Some(session);
        });
        Ok(user)
    }

    async fn abort_sign_in(&self, err: AuthError) -> AuthError {
        leptos::logging::warn!("sign-in failed: {err}");
        self.sign_out().await;
        err
    }

    /// Drop the session locally and at the provider. Idempotent, never fails.
    pub async fn sign_out(&self) {
        self.inner.restore_superseded.store(true, Ordering::SeqCst);
        let token = self.access_token();
        self.inner.provider.clear(token.as_deref()).await;
        self.update(AuthState::clear_session);
    }

    /// Drop the session if `rejected_token` is still its access token.
    ///
    /// A rejection that arrives after the user already signed in again
    /// refers to a session that no longer exists and is ignored.
    pub async fn expire(&self, rejected_token: &str) {
        if self.access_token().as_deref() != Some(rejected_token) {
            return;
        }
        leptos::logging::warn!("backend rejected the session token, signing out");
        self.sign_out().await;
    }

    /// Apply `mutate` and notify listeners if the state changed.
    fn update(&self, mutate: impl FnOnce(&mut AuthState)) {
        let changed = {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            let before = state.clone();
            mutate(&mut *state);
            (*state != before).then(|| state.clone())
        };
        if let Some(state) = changed {
            let listeners: Vec<Listener> = self.listeners().iter().map(|(_, l)| Arc::clone(l)).collect();
            for listener in listeners {
                listener(&state);
            }
        }
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
