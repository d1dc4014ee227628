use super::*;

// =============================================================
// AuthState constructors
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(state.session.is_none());
}

#[test]
fn auth_state_default_not_loading() {
    let state = AuthState::default();
    assert!(!state.loading);
}

#[test]
fn restoring_state_is_loading_and_anonymous() {
    let state = AuthState::restoring();
    assert!(state.loading);
    assert!(!state.is_authenticated());
}

#[test]
fn signed_in_mirrors_session_user() {
    let session = Session {
        access_token: "at".to_owned(),
        refresh_token: None,
        expires_at: None,
        user: User { id: "u1".to_owned(), role: Role::Candidate, ..User::default() },
    };
    let state = AuthState::signed_in(session.clone());
    assert_eq!(state.user.as_ref(), Some(&session.user));
    assert_eq!(state.role(), Some(&Role::Candidate));
    assert!(!state.loading);
}

#[test]
fn clear_session_keeps_loading_flag() {
    let mut state = AuthState::restoring();
    state.clear_session();
    assert!(state.loading);
    assert!(state.user.is_none());
}
