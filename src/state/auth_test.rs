use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn user(is_admin: bool) -> SessionUser {
    SessionUser {
        identity: UserIdentity {
            id: "jdoe".to_owned(),
            email: "jdoe@example.edu".to_owned(),
            display_name: "Jane Doe".to_owned(),
            given_name: Some("Jane".to_owned()),
        },
        is_admin,
    }
}

fn recorder(store: &AuthStore) -> (Rc<RefCell<Vec<AuthState>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = store.subscribe(move |state| sink.borrow_mut().push(state.clone()));
    (seen, sub)
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_store_is_loading_and_unauthenticated() {
    let store = AuthStore::new();
    let state = store.snapshot();
    assert!(state.loading);
    assert!(!state.authenticated);
    assert!(state.user.is_none());
    assert!(state.access_token.is_none());
    assert!(state.error.is_none());
}

#[test]
fn auth_state_default_is_initial() {
    assert_eq!(AuthState::default(), AuthState::initial());
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn set_authenticated_populates_identity_and_clears_error() {
    let store = AuthStore::new();
    store.set_error("boom");
    store.set_authenticated(user(false), "tok");
    let state = store.snapshot();
    assert!(state.authenticated);
    assert!(!state.loading);
    assert_eq!(state.user, Some(user(false)));
    assert_eq!(state.access_token.as_deref(), Some("tok"));
    assert_eq!(state.error, None);
}

#[test]
fn set_loading_preserves_other_fields() {
    let store = AuthStore::new();
    store.set_authenticated(user(true), "tok");
    store.set_loading(true);
    let state = store.snapshot();
    assert!(state.loading);
    assert!(state.authenticated);
    assert_eq!(state.access_token.as_deref(), Some("tok"));
}

#[test]
fn set_error_clears_identity() {
    let store = AuthStore::new();
    store.set_authenticated(user(true), "tok");
    store.set_error("User denied");
    assert_eq!(
        store.snapshot(),
        AuthState {
            authenticated: false,
            loading: false,
            user: None,
            access_token: None,
            error: Some("User denied".to_owned()),
        }
    );
}

#[test]
fn reset_ends_with_loading_false() {
    let store = AuthStore::new();
    store.set_authenticated(user(true), "tok");
    store.reset();
    assert_eq!(
        store.snapshot(),
        AuthState { authenticated: false, loading: false, user: None, access_token: None, error: None }
    );
}

#[test]
fn reset_notifies_twice_with_loading_then_settled() {
    let store = AuthStore::new();
    store.set_authenticated(user(false), "tok");
    let (seen, _sub) = recorder(&store);
    seen.borrow_mut().clear();

    store.reset();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].loading);
    assert!(!seen[1].loading);
    assert!(!seen[1].authenticated);
}

// =============================================================
// Projections
// =============================================================

#[test]
fn projections_follow_state() {
    let store = AuthStore::new();
    assert!(!store.is_authenticated());
    assert!(store.is_loading());
    assert!(store.current_user().is_none());

    store.set_authenticated(user(true), "tok");
    assert!(store.is_authenticated());
    assert!(!store.is_loading());
    assert_eq!(store.current_user().map(|u| u.identity.id), Some("jdoe".to_owned()));
    assert!(store.is_admin());
}

#[test]
fn is_admin_false_without_user() {
    let store = AuthStore::new();
    store.set_authenticated(user(true), "tok");
    store.set_error("expired");
    assert!(!store.is_admin());
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn subscribe_delivers_current_state_immediately() {
    let store = AuthStore::new();
    let (seen, _sub) = recorder(&store);
    assert_eq!(seen.borrow().as_slice(), &[AuthState::initial()]);
}

#[test]
fn subscribe_receives_every_change() {
    let store = AuthStore::new();
    let (seen, _sub) = recorder(&store);
    store.set_loading(false);
    store.set_error("x");
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(seen.borrow()[2].error.as_deref(), Some("x"));
}

#[test]
fn unsubscribe_stops_notifications() {
    let store = AuthStore::new();
    let (seen, sub) = recorder(&store);
    assert_eq!(store.observer_count(), 1);
    sub.unsubscribe();
    assert_eq!(store.observer_count(), 0);
    store.set_loading(false);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn unsubscribe_only_removes_its_own_observer() {
    let store = AuthStore::new();
    let (first, first_sub) = recorder(&store);
    let (second, _second_sub) = recorder(&store);
    first_sub.unsubscribe();
    store.set_loading(false);
    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 2);
}

#[test]
fn unsubscribe_after_store_dropped_is_noop() {
    let store = AuthStore::new();
    let sub = store.subscribe(|_| {});
    drop(store);
    sub.unsubscribe();
}

#[test]
fn observer_may_write_back_into_store() {
    let store = AuthStore::new();
    let handle = store.clone();
    let _sub = store.subscribe(move |state| {
        if state.error.is_some() && state.loading {
            handle.set_loading(false);
        }
    });
    store.set_error("x");
    store.set_loading(true);
    assert!(!store.is_loading());
}

#[test]
fn clones_share_state() {
    let store = AuthStore::new();
    let other = store.clone();
    other.set_authenticated(user(false), "tok");
    assert!(store.is_authenticated());
}
