use std::sync::{Arc, Mutex};

use futures::executor::block_on;

use super::*;
use crate::config::ProviderEndpoint;
use crate::net::auth_provider::SESSION_STORAGE_KEY;
use crate::net::error::ProviderError;
use crate::net::transport::Method;
use crate::net::types::Role;
use crate::test_support::{FakeTransport, MemoryStore};

struct Harness {
    transport: FakeTransport,
    storage: MemoryStore,
    store: SessionStore<FakeTransport, MemoryStore>,
}

fn harness() -> Harness {
    let config = ClientConfig {
        api_base_url: "http://api.test/api".to_owned(),
        auth_provider: Some(ProviderEndpoint { url: "http://auth.test".to_owned(), api_key: "anon".to_owned() }),
    };
    let transport = FakeTransport::default();
    let storage = MemoryStore::default();
    let store = SessionStore::new(&config, transport.clone(), storage.clone());
    Harness { transport, storage, store }
}

fn backend_accepts(h: &Harness, role: &str) {
    h.transport.respond(
        Method::Post,
        "/api/auth/login",
        200,
        serde_json::json!({
            "access_token": "at",
            "refresh_token": "rt",
            "user": { "id": "u1", "email": "user@acme.io", "role": role }
        }),
    );
}

fn refresh_held(h: &Harness) -> futures::channel::oneshot::Sender<()> {
    h.transport.respond_held(
        Method::Post,
        "/auth/v1/token?grant_type=refresh_token",
        200,
        serde_json::json!({
            "access_token": "fresh-at",
            "refresh_token": "rt-2",
            "expires_in": 3600,
            "user": { "id": "u1", "email": "hr@acme.io", "app_metadata": { "role": "hr_user" } }
        }),
    )
}

fn persisted_token(h: &Harness) -> Option<String> {
    let raw = h.storage.get(SESSION_STORAGE_KEY)?;
    Some(serde_json::from_str::<Session>(&raw).unwrap().access_token)
}

fn provider_accepts(h: &Harness) {
    h.transport.respond(Method::Get, "/auth/v1/user", 200, serde_json::json!({ "id": "u1" }));
    h.transport.respond(Method::Post, "/auth/v1/logout", 204, serde_json::json!({}));
}

fn persisted(h: &Harness, session: &Session) {
    h.storage.insert(SESSION_STORAGE_KEY, &serde_json::to_string(session).unwrap());
}

fn session(expires_at: Option<i64>, refresh_token: Option<&str>) -> Session {
    Session {
        access_token: "stored-at".to_owned(),
        refresh_token: refresh_token.map(str::to_owned),
        expires_at,
        user: User { id: "u1".to_owned(), email: "hr@acme.io".to_owned(), role: Role::HrUser, ..User::default() },
    }
}

fn signed_out_state() -> AuthState {
    AuthState::anonymous()
}

// =============================================================
// restore
// =============================================================

#[test]
fn new_store_is_loading() {
    let h = harness();
    assert_eq!(h.store.snapshot(), AuthState::restoring());
}

#[test]
fn restore_without_record_ends_anonymous() {
    let h = harness();
    block_on(h.store.restore());
    assert_eq!(h.store.snapshot(), signed_out_state());
}

#[test]
fn restore_loads_valid_record() {
    let h = harness();
    let stored = session(Some(now_unix_secs() + 3600), None);
    persisted(&h, &stored);

    block_on(h.store.restore());

    assert_eq!(h.store.snapshot(), AuthState::signed_in(stored));
    assert!(h.transport.requests().is_empty());
}

#[test]
fn restore_with_corrupt_record_ends_anonymous() {
    let h = harness();
    h.storage.insert(SESSION_STORAGE_KEY, "garbage");

    block_on(h.store.restore());

    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn restore_expired_record_without_refresh_token_is_forgotten() {
    let h = harness();
    persisted(&h, &session(Some(0), None));

    block_on(h.store.restore());

    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn restore_refreshes_expired_record() {
    let h = harness();
    persisted(&h, &session(Some(0), Some("rt")));
    h.transport.respond(
        Method::Post,
        "/auth/v1/token?grant_type=refresh_token",
        200,
        serde_json::json!({
            "access_token": "fresh-at",
            "refresh_token": "rt-2",
            "expires_in": 3600,
            "user": { "id": "u1", "email": "hr@acme.io", "app_metadata": { "role": "hr_user" } }
        }),
    );

    block_on(h.store.restore());

    let state = h.store.snapshot();
    assert!(!state.loading);
    assert_eq!(h.store.access_token().as_deref(), Some("fresh-at"));
    assert_eq!(state.role(), Some(&Role::HrUser));
}

#[test]
fn restore_failed_refresh_ends_anonymous() {
    let h = harness();
    persisted(&h, &session(Some(0), Some("rt")));
    h.transport.fail(Method::Post, "/auth/v1/token?grant_type=refresh_token", "offline");

    block_on(h.store.restore());

    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn restore_runs_once() {
    let h = harness();
    block_on(h.store.restore());
    persisted(&h, &session(None, None));

    block_on(h.store.restore());

    assert_eq!(h.store.snapshot(), signed_out_state());
}

#[test]
fn restore_does_not_overwrite_completed_sign_in() {
    let h = harness();
    backend_accepts(&h, "hr_admin");
    provider_accepts(&h);
    block_on(h.store.sign_in("user@acme.io", "pw")).unwrap();
    h.storage.remove(SESSION_STORAGE_KEY);

    block_on(h.store.restore());

    assert_eq!(h.store.access_token().as_deref(), Some("at"));
    assert!(!h.store.snapshot().loading);
}

#[test]
fn sign_out_during_refresh_is_not_undone_by_restore() {
    let h = harness();
    persisted(&h, &session(Some(0), Some("rt")));
    let release = refresh_held(&h);

    block_on(async {
        futures::join!(h.store.restore(), async {
            h.store.sign_out().await;
            release.send(()).unwrap();
        })
    });

    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn sign_in_during_refresh_keeps_new_session() {
    let h = harness();
    persisted(&h, &session(Some(0), Some("rt")));
    let release = refresh_held(&h);
    backend_accepts(&h, "hr_admin");
    provider_accepts(&h);

    block_on(async {
        futures::join!(h.store.restore(), async {
            h.store.sign_in("user@acme.io", "pw").await.unwrap();
            assert!(h.store.snapshot().loading);
            release.send(()).unwrap();
        })
    });

    let state = h.store.snapshot();
    assert!(!state.loading);
    assert_eq!(h.store.access_token().as_deref(), Some("at"));
    assert_eq!(state.role(), Some(&Role::HrAdmin));
    assert_eq!(persisted_token(&h).as_deref(), Some("at"));
}

// =============================================================
// sign_in
// =============================================================

#[test]
fn sign_in_super_admin_sets_session_and_role() {
    let h = harness();
    block_on(h.store.restore());
    backend_accepts(&h, "super_admin");
    provider_accepts(&h);

    let user = block_on(h.store.sign_in("user@acme.io", "pw")).unwrap();

    assert_eq!(user.role, Role::SuperAdmin);
    let state = h.store.snapshot();
    assert_eq!(state.role(), Some(&Role::SuperAdmin));
    assert_eq!(state.session.as_ref().map(|s| s.access_token.as_str()), Some("at"));
    assert!(h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn sign_in_with_unrecognized_role_succeeds() {
    let h = harness();
    block_on(h.store.restore());
    backend_accepts(&h, "contractor");
    provider_accepts(&h);

    let user = block_on(h.store.sign_in("user@acme.io", "pw")).unwrap();

    assert_eq!(user.role, Role::Unknown("contractor".to_owned()));
    assert_eq!(crate::util::navigation::landing_route(&user.role), "/hr/dashboard");
}

#[test]
fn sign_in_with_null_role_lands_on_hr_dashboard() {
    let h = harness();
    block_on(h.store.restore());
    h.transport.respond(
        Method::Post,
        "/api/auth/login",
        200,
        serde_json::json!({
            "access_token": "at",
            "user": { "id": "u1", "email": "user@acme.io", "role": null }
        }),
    );
    provider_accepts(&h);

    let user = block_on(h.store.sign_in("user@acme.io", "pw")).unwrap();

    assert_eq!(user.role, Role::Unknown(String::new()));
    assert_eq!(crate::util::navigation::landing_route(&user.role), "/hr/dashboard");
}

#[test]
fn sign_in_wrong_password_stays_anonymous_with_server_message() {
    let h = harness();
    block_on(h.store.restore());
    h.transport.respond(Method::Post, "/api/auth/login", 401, serde_json::json!({ "detail": "Invalid credentials" }));

    let err = block_on(h.store.sign_in("user@acme.io", "wrong")).unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!err.is_system());
    assert_eq!(h.store.snapshot(), signed_out_state());
}

#[test]
fn sign_in_sync_failure_equals_fresh_sign_out() {
    let h = harness();
    block_on(h.store.restore());
    backend_accepts(&h, "hr_user");
    h.transport.respond(Method::Get, "/auth/v1/user", 401, serde_json::json!({ "msg": "invalid JWT" }));

    let err = block_on(h.store.sign_in("user@acme.io", "pw")).unwrap_err();

    assert_eq!(err, AuthError::SessionSync(ProviderError::Rejected { status: 401, message: "invalid JWT".to_owned() }));
    assert!(err.is_system());
    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn sign_in_sync_failure_drops_previous_session() {
    let h = harness();
    persisted(&h, &session(None, None));
    block_on(h.store.restore());
    backend_accepts(&h, "hr_user");
    h.transport.fail(Method::Get, "/auth/v1/user", "offline");

    assert!(block_on(h.store.sign_in("user@acme.io", "pw")).is_err());

    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
}

#[test]
fn sign_in_before_restore_leaves_loading_set() {
    let h = harness();
    backend_accepts(&h, "candidate");
    provider_accepts(&h);

    block_on(h.store.sign_in("user@acme.io", "pw")).unwrap();

    let state = h.store.snapshot();
    assert!(state.loading);
    assert_eq!(state.role(), Some(&Role::Candidate));
}

#[test]
fn sign_in_does_not_touch_loading_after_restore() {
    let h = harness();
    block_on(h.store.restore());
    h.transport.fail(Method::Post, "/api/auth/login", "offline");

    let _ = block_on(h.store.sign_in("user@acme.io", "pw"));

    assert!(!h.store.snapshot().loading);
}

// =============================================================
// sign_out / expire
// =============================================================

#[test]
fn sign_in_then_sign_out_is_anonymous() {
    let h = harness();
    block_on(h.store.restore());
    backend_accepts(&h, "candidate");
    provider_accepts(&h);

    block_on(h.store.sign_in("user@acme.io", "pw")).unwrap();
    block_on(h.store.sign_out());

    let state = h.store.snapshot();
    assert!(state.session.is_none());
    assert!(state.user.is_none());
    assert!(!h.storage.contains(SESSION_STORAGE_KEY));
    let logout = h.transport.requests_to("/auth/v1/logout");
    assert_eq!(logout[0].header_value("authorization"), Some("Bearer at"));
}

#[test]
fn sign_out_when_signed_out_is_a_no_op() {
    let h = harness();
    block_on(h.store.restore());

    block_on(h.store.sign_out());
    block_on(h.store.sign_out());

    assert_eq!(h.store.snapshot(), signed_out_state());
    assert!(h.transport.requests().is_empty());
}

#[test]
fn sign_out_during_restore_keeps_loading() {
    let h = harness();
    block_on(h.store.sign_out());
    assert!(h.store.snapshot().loading);
}

#[test]
fn expire_drops_session() {
    let h = harness();
    persisted(&h, &session(None, None));
    block_on(h.store.restore());

    block_on(h.store.expire("stored-at"));

    assert_eq!(h.store.snapshot(), signed_out_state());
}

#[test]
fn expire_ignores_stale_token() {
    let h = harness();
    persisted(&h, &session(None, None));
    block_on(h.store.restore());

    block_on(h.store.expire("older-at"));

    assert_eq!(h.store.access_token().as_deref(), Some("stored-at"));
    assert!(h.storage.contains(SESSION_STORAGE_KEY));
}

// =============================================================
// subscribe
// =============================================================

#[test]
fn subscribe_replays_current_state_then_changes() {
    let h = harness();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    h.store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

    block_on(h.store.restore());

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec![AuthState::restoring(), AuthState::anonymous()]);
}

#[test]
fn unchanged_state_does_not_notify() {
    let h = harness();
    block_on(h.store.restore());
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    h.store.subscribe(move |_| *counter.lock().unwrap() += 1);

    block_on(h.store.sign_out());

    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let h = harness();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let id = h.store.subscribe(move |_| *counter.lock().unwrap() += 1);
    h.store.unsubscribe(id);

    block_on(h.store.restore());

    assert_eq!(*calls.lock().unwrap(), 1);
}
