//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read auth status through a `RwSignal<AuthState>` mirrored from
//! the [`AuthStore`], and route components apply identical unauthenticated
//! redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::state::auth::{AuthState, AuthStore};
use crate::util::navigation::{CurrentLocation, Navigator};

/// Mirror `store` into a new signal owned by the current reactive owner.
///
/// The store observer is removed when that owner is cleaned up, so remounting
/// a component does not pile up observers. Outside any owner the observer
/// lives as long as the store.
pub fn bind_signal(store: &AuthStore) -> RwSignal<AuthState> {
    let signal = RwSignal::new(store.snapshot());
    let sub = StoredValue::new_local(Some(store.subscribe(move |state| signal.set(state.clone()))));
    on_cleanup(move || {
        if let Some(sub) = sub.try_update_value(Option::take).flatten() {
            sub.unsubscribe();
        }
    });
    signal
}

/// Bind `store` to a signal and provide it as context for child components.
pub fn provide_auth_context(store: &AuthStore) -> RwSignal<AuthState> {
    let signal = bind_signal(store);
    provide_context(signal);
    signal
}

/// True once auth has settled with nobody signed in, unless already on the
/// login page.
pub fn should_redirect_unauth(state: &AuthState, current_path: &str, login_path: &str) -> bool {
    !state.loading && !state.authenticated && current_path != login_path
}

/// One pass of the unauthenticated redirect. Returns whether it navigated.
pub fn redirect_if_unauth(
    state: &AuthState,
    navigator: &dyn Navigator,
    location: &dyn CurrentLocation,
    login_path: &str,
) -> bool {
    if !should_redirect_unauth(state, &location.path(), login_path) {
        return false;
    }
    navigator.navigate(login_path);
    true
}

/// Navigate to `login_path` whenever auth has loaded and no user is present.
pub fn install_unauth_redirect(
    auth: RwSignal<AuthState>,
    navigator: Rc<dyn Navigator>,
    location: Rc<dyn CurrentLocation>,
    login_path: String,
) {
    Effect::new(move || {
        redirect_if_unauth(&auth.get(), navigator.as_ref(), location.as_ref(), &login_path);
    });
}
