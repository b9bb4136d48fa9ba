//! Drives the auth store from session manager outcomes.
//!
//! Components call these from event handlers (typically inside
//! `leptos::task::spawn_local`); the store update is the only output they
//! need to observe.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use super::manager::SessionManager;
use crate::error::AuthError;
use crate::state::auth::AuthStore;

/// Session manager paired with the auth store it feeds.
#[derive(Clone)]
pub struct AuthFlow {
    manager: SessionManager,
    store: AuthStore,
}

impl AuthFlow {
    pub fn new(manager: SessionManager, store: AuthStore) -> Self {
        Self { manager, store }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    /// Mirror the persisted session into the store.
    pub fn restore(&self) {
        let state = self.manager.session_state();
        match (state.user, state.access_token) {
            (Some(user), Some(token)) if state.authenticated => self.store.set_authenticated(user, token),
            _ => self.store.reset(),
        }
    }

    /// Start a sign-in. On success the page navigates away; on failure the
    /// store carries the error.
    ///
    /// # Errors
    ///
    /// Propagates the [`AuthError`] after recording it in the store.
    pub async fn login(&self) -> Result<(), AuthError> {
        self.store.set_loading(true);
        self.manager.initiate_login().await.map_err(|e| {
            self.store.set_error(e.message());
            e
        })
    }

    /// Handle the page load that may be an identity-provider redirect.
    ///
    /// With no callback in progress this falls back to [`restore`](Self::restore).
    ///
    /// # Errors
    ///
    /// Propagates the [`AuthError`] after recording it in the store.
    pub async fn handle_callback(&self) -> Result<(), AuthError> {
        self.store.set_loading(true);
        match self.manager.complete_login_from_location().await {
            Ok(Some(outcome)) => {
                self.store.set_authenticated(outcome.session_user(), outcome.access_token);
                Ok(())
            }
            Ok(None) => {
                self.restore();
                Ok(())
            }
            Err(e) => {
                self.store.set_error(e.message());
                Err(e)
            }
        }
    }

    /// Sign out: clear the session, reset the store, navigate away.
    pub async fn logout(&self) {
        self.manager.end_session().await;
        self.store.reset();
    }

    /// Check the session with the backend; resets the store if it is gone.
    pub async fn revalidate(&self) -> bool {
        let valid = self.manager.validate_remote().await;
        if !valid {
            self.store.reset();
        }
        valid
    }
}
