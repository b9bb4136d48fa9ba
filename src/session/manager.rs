//! Session manager: login redirect, code exchange, persisted session, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sole owner of the persisted session. Talks to the backend auth proxy
//! through an [`HttpBackend`] and to the page through [`Navigator`] and
//! [`CurrentLocation`], so every side effect is injectable.
//!
//! ERROR HANDLING
//! ==============
//! Login and exchange failures come back as [`AuthError`]. Expiry and
//! corrupted storage are state observations: the session is cleared and the
//! caller sees "unauthenticated". `end_session` never fails.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::rc::Rc;

use super::callback::CallbackParams;
use super::store::{SessionStore, StoredSession};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::net::api;
use crate::net::http::{HttpBackend, bearer_header};
use crate::net::types::{CallbackRequest, UserIdentity};
use crate::state::auth::{AuthState, SessionUser};
use crate::util::clock::Clock;
use crate::util::navigation::{CurrentLocation, Navigator};
use crate::util::storage::KeyValueStore;

/// Result of a completed code exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: UserIdentity,
    pub is_admin: bool,
    pub access_token: String,
}

impl LoginOutcome {
    pub fn session_user(&self) -> SessionUser {
        SessionUser { identity: self.user.clone(), is_admin: self.is_admin }
    }
}

/// Owns the persisted session and the backend auth calls.
#[derive(Clone)]
pub struct SessionManager {
    config: AuthConfig,
    store: SessionStore,
    http: Rc<dyn HttpBackend>,
    navigator: Rc<dyn Navigator>,
    location: Rc<dyn CurrentLocation>,
    clock: Rc<dyn Clock>,
}

impl SessionManager {
    pub fn new(
        config: AuthConfig,
        storage: Rc<dyn KeyValueStore>,
        http: Rc<dyn HttpBackend>,
        navigator: Rc<dyn Navigator>,
        location: Rc<dyn CurrentLocation>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let store = SessionStore::new(storage, config.storage_keys.clone());
        Self { config, store, http, navigator, location, clock }
    }

    /// Manager wired to `localStorage`, `fetch` and `window.location`.
    #[cfg(feature = "hydrate")]
    pub fn browser(config: AuthConfig) -> Self {
        use crate::net::http::GlooBackend;
        use crate::util::clock::SystemClock;
        use crate::util::navigation::BrowserWindow;
        use crate::util::storage::LocalStorageStore;

        Self::new(
            config,
            Rc::new(LocalStorageStore),
            Rc::new(GlooBackend),
            Rc::new(BrowserWindow),
            Rc::new(BrowserWindow),
            Rc::new(SystemClock),
        )
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Fetch the login URL from the backend and navigate to it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LoginUrl`] if the backend cannot supply a URL.
    /// Session state is not touched.
    pub async fn initiate_login(&self) -> Result<(), AuthError> {
        let url = api::fetch_login_url(self.http.as_ref(), &self.config).await?;
        leptos::logging::log!("redirecting to identity provider");
        self.navigator.navigate(&url);
        Ok(())
    }

    /// Finish an identity-provider redirect.
    ///
    /// Returns `Ok(None)` when `params` carries neither a code nor an error
    /// (no callback in progress). On success the session is persisted and the
    /// visible URL is rewritten to its path so a reload cannot replay the code.
    ///
    /// # Errors
    ///
    /// [`AuthError::Authentication`] when the provider reported an error;
    /// [`AuthError::Exchange`] when the backend rejects or fails the exchange,
    /// or when the session cannot be persisted. The URL is left untouched in
    /// both cases.
    pub async fn complete_login(&self, params: &CallbackParams) -> Result<Option<LoginOutcome>, AuthError> {
        if let Some(error) = &params.error {
            let message = params
                .error_description
                .clone()
                .unwrap_or_else(|| "Authentication failed".to_owned());
            leptos::logging::warn!("identity provider error: {error} ({message})");
            return Err(AuthError::Authentication(message));
        }
        let Some(code) = &params.code else {
            return Ok(None);
        };

        let request = CallbackRequest {
            code: code.clone(),
            redirect_uri: self.config.redirect_uri(&self.location.origin()),
        };
        let exchanged = api::exchange_code(self.http.as_ref(), &self.config, &request).await?;

        let expires_at = self.clock.now_ms().saturating_add(exchanged.expires_in.saturating_mul(1000));
        let session = StoredSession {
            access_token: exchanged.access_token,
            user: exchanged.user,
            is_admin: exchanged.is_admin,
            expires_at,
        };
        self.store.save(&session).map_err(|e| {
            leptos::logging::warn!("failed to persist session: {e}");
            AuthError::Exchange(e.to_string())
        })?;

        self.navigator.replace_url(&self.location.path());
        leptos::logging::log!("signed in as {} (expires at {expires_at})", session.user.id);

        Ok(Some(LoginOutcome {
            user: session.user,
            is_admin: session.is_admin,
            access_token: session.access_token,
        }))
    }

    /// [`complete_login`](Self::complete_login) using the current page query.
    ///
    /// # Errors
    ///
    /// Same as [`complete_login`](Self::complete_login).
    pub async fn complete_login_from_location(&self) -> Result<Option<LoginOutcome>, AuthError> {
        let params = CallbackParams::from_query(&self.location.query());
        self.complete_login(&params).await
    }

    /// Snapshot of the persisted session (`loading` is always `false`).
    ///
    /// Expired, partial or unparsable sessions are deleted and reported as
    /// unauthenticated.
    pub fn session_state(&self) -> AuthState {
        match self.store.load(self.clock.now_ms()) {
            Some(session) => AuthState {
                authenticated: true,
                loading: false,
                user: Some(SessionUser { identity: session.user, is_admin: session.is_admin }),
                access_token: Some(session.access_token),
                error: None,
            },
            None => AuthState { loading: false, ..AuthState::initial() },
        }
    }

    /// The access token, if the session is present and unexpired.
    pub fn access_token(&self) -> Option<String> {
        self.store.load(self.clock.now_ms()).map(|s| s.access_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// `Authorization` header value for outgoing API calls.
    pub fn authorization_header(&self) -> Option<String> {
        self.access_token().map(|token| bearer_header(&token))
    }

    /// Ask the backend whether the token is still accepted.
    ///
    /// A rejected token or unreachable backend clears the session and yields
    /// `false`. Never called automatically.
    pub async fn validate_remote(&self) -> bool {
        let Some(token) = self.access_token() else {
            return false;
        };
        match api::validate_token(self.http.as_ref(), &self.config, &token).await {
            Some(valid) => valid,
            None => {
                self.store.clear();
                false
            }
        }
    }

    /// Ask the backend whether `andrew_id` is an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Backend`] if the lookup fails.
    pub async fn check_admin(&self, andrew_id: &str) -> Result<bool, AuthError> {
        api::check_admin(self.http.as_ref(), &self.config, andrew_id).await
    }

    /// Clear the session and leave via the provider's logout URL, or the app
    /// root when the backend has none to offer.
    pub async fn end_session(&self) {
        let logout_url = api::fetch_logout_url(self.http.as_ref(), &self.config).await;
        self.store.clear();
        let target = logout_url.unwrap_or_else(|| self.config.app_root.clone());
        leptos::logging::log!("signed out; navigating to {target}");
        self.navigator.navigate(&target);
    }
}
