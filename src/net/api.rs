//! Typed helpers for each backend auth endpoint.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is logged here once and returned as an [`AuthError`] with a
//! human-readable message. Logout-url lookups are the exception: they fall
//! back to `None` so sign-out can always proceed.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::http::{HttpBackend, HttpResponse};
use super::types::{
    CallbackRequest, CallbackResponse, CheckAdminRequest, CheckAdminResponse, LoginUrlResponse, LogoutUrlResponse,
    StatusResponse, UserIdentity,
};
use crate::config::AuthConfig;
use crate::error::AuthError;

const LOGIN_URL_FAILED: &str = "Failed to get login URL";
const EXCHANGE_FAILED: &str = "Failed to exchange code for tokens";
const AUTHENTICATION_FAILED: &str = "Authentication failed";
const CHECK_ADMIN_FAILED: &str = "Failed to check admin status";

/// Successful code-exchange payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangedSession {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub is_admin: bool,
    pub user: UserIdentity,
}

/// Pull the backend's `error` string out of a response body, or use `fallback`.
fn error_message(resp: &HttpResponse, fallback: &str) -> String {
    resp.json::<StatusResponse>()
        .unwrap_or_default()
        .error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Ask the backend for the identity-provider login URL.
///
/// # Errors
///
/// Returns [`AuthError::LoginUrl`] on network failure, a malformed body, or
/// `success:false`.
pub async fn fetch_login_url(http: &dyn HttpBackend, config: &AuthConfig) -> Result<String, AuthError> {
    let resp = http.get(&config.endpoint("login-url"), None).await.map_err(|e| {
        leptos::logging::warn!("login-url request failed: {e}");
        AuthError::LoginUrl(LOGIN_URL_FAILED.to_owned())
    })?;
    let body: LoginUrlResponse = resp.json().map_err(|e| {
        leptos::logging::warn!("login-url response malformed: {e}");
        AuthError::LoginUrl(LOGIN_URL_FAILED.to_owned())
    })?;
    match body.login_url {
        Some(url) if body.success && !url.is_empty() => Ok(url),
        _ => {
            leptos::logging::warn!("login-url rejected: status={}", resp.status);
            Err(AuthError::LoginUrl(LOGIN_URL_FAILED.to_owned()))
        }
    }
}

/// Trade an authorization code for a session via the backend.
///
/// # Errors
///
/// Returns [`AuthError::Exchange`] carrying the backend's message on a
/// non-2xx status, `success:false`, network failure, or an incomplete body.
pub async fn exchange_code(
    http: &dyn HttpBackend,
    config: &AuthConfig,
    request: &CallbackRequest,
) -> Result<ExchangedSession, AuthError> {
    let payload = serde_json::to_value(request).map_err(|e| AuthError::Exchange(e.to_string()))?;
    let resp = http.post_json(&config.endpoint("callback"), &payload).await.map_err(|e| {
        leptos::logging::warn!("token exchange request failed: {e}");
        AuthError::Exchange(e.to_string())
    })?;

    if !resp.is_success() {
        let message = error_message(&resp, EXCHANGE_FAILED);
        leptos::logging::warn!("token exchange failed: status={} error={message}", resp.status);
        return Err(AuthError::Exchange(message));
    }

    let body: CallbackResponse = resp.json().map_err(|e| {
        leptos::logging::warn!("token exchange response malformed: {e}");
        AuthError::Exchange(EXCHANGE_FAILED.to_owned())
    })?;
    if !body.success {
        let message = body.error.filter(|e| !e.is_empty()).unwrap_or_else(|| AUTHENTICATION_FAILED.to_owned());
        leptos::logging::warn!("token exchange rejected: {message}");
        return Err(AuthError::Exchange(message));
    }

    match (body.access_token, body.expires_in, body.user) {
        (Some(access_token), Some(expires_in), Some(user)) if !access_token.is_empty() => Ok(ExchangedSession {
            access_token,
            expires_in,
            is_admin: body.is_admin,
            user: user.normalized(),
        }),
        _ => {
            leptos::logging::warn!("token exchange response missing session fields");
            Err(AuthError::Exchange(EXCHANGE_FAILED.to_owned()))
        }
    }
}

/// Check a token against `GET me`.
///
/// `None` means the backend rejected the token or could not be reached;
/// `Some(flag)` is the backend's stated validity.
pub async fn validate_token(http: &dyn HttpBackend, config: &AuthConfig, token: &str) -> Option<bool> {
    let resp = match http.get(&config.endpoint("me"), Some(token)).await {
        Ok(resp) => resp,
        Err(e) => {
            leptos::logging::warn!("session validation request failed: {e}");
            return None;
        }
    };
    if !resp.is_success() {
        leptos::logging::warn!("session rejected by backend: status={}", resp.status);
        return None;
    }
    match resp.json::<StatusResponse>() {
        Ok(body) => Some(body.success),
        Err(e) => {
            leptos::logging::warn!("session validation response malformed: {e}");
            Some(false)
        }
    }
}

/// Ask the backend for the identity-provider logout URL. Failures yield `None`.
pub async fn fetch_logout_url(http: &dyn HttpBackend, config: &AuthConfig) -> Option<String> {
    let resp = match http.get(&config.endpoint("logout-url"), None).await {
        Ok(resp) => resp,
        Err(e) => {
            leptos::logging::warn!("logout-url request failed: {e}");
            return None;
        }
    };
    match resp.json::<LogoutUrlResponse>() {
        Ok(body) if body.success => body.logout_url.filter(|url| !url.is_empty()),
        Ok(_) => None,
        Err(e) => {
            leptos::logging::warn!("logout-url response malformed: {e}");
            None
        }
    }
}

/// Ask the backend whether `andrew_id` is on the admin list.
///
/// # Errors
///
/// Returns [`AuthError::Backend`] on network failure, non-2xx status, or
/// `success:false`.
pub async fn check_admin(http: &dyn HttpBackend, config: &AuthConfig, andrew_id: &str) -> Result<bool, AuthError> {
    let request = CheckAdminRequest { andrew_id: andrew_id.trim().to_owned() };
    let payload = serde_json::to_value(&request).map_err(|e| AuthError::Backend(e.to_string()))?;
    let resp = http.post_json(&config.endpoint("check-admin"), &payload).await.map_err(|e| {
        leptos::logging::warn!("check-admin request failed: {e}");
        AuthError::Backend(e.to_string())
    })?;
    if !resp.is_success() {
        let message = error_message(&resp, CHECK_ADMIN_FAILED);
        leptos::logging::warn!("check-admin failed: status={} error={message}", resp.status);
        return Err(AuthError::Backend(message));
    }
    let body: CheckAdminResponse = resp.json().map_err(|e| {
        leptos::logging::warn!("check-admin response malformed: {e}");
        AuthError::Backend(CHECK_ADMIN_FAILED.to_owned())
    })?;
    if !body.success {
        return Err(AuthError::Backend(body.error.unwrap_or_else(|| CHECK_ADMIN_FAILED.to_owned())));
    }
    Ok(body.is_admin)
}
