//! Failures surfaced by the session manager.
//!
//! Expiry and storage corruption are not here: expiry is an ordinary state
//! observation and corrupted storage is healed in place.

/// Typed auth failure carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend could not supply a login redirect.
    #[error("{0}")]
    LoginUrl(String),
    /// The identity provider reported an error on the callback.
    #[error("{0}")]
    Authentication(String),
    /// The backend rejected or failed the code exchange.
    #[error("{0}")]
    Exchange(String),
    /// Any other backend call failed.
    #[error("{0}")]
    Backend(String),
}

impl AuthError {
    /// Message suitable for display in the UI.
    pub fn message(&self) -> &str {
        match self {
            Self::LoginUrl(m) | Self::Authentication(m) | Self::Exchange(m) | Self::Backend(m) => m,
        }
    }
}
