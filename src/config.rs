//! Client configuration: backend paths, callback route, storage keys.
//!
//! Browser builds have no process environment, so overrides are captured at
//! compile time through `option_env!` and fall back to the defaults the
//! portal backend ships with.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const DEFAULT_API_BASE: &str = "/api/auth";
const DEFAULT_CALLBACK_PATH: &str = "/oauth2/callback";
const DEFAULT_APP_ROOT: &str = "/";
const DEFAULT_STORAGE_PREFIX: &str = "auth_";

/// `localStorage` keys for the four persisted session entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    pub access_token: String,
    pub user_info: String,
    pub is_admin: String,
    pub expires_at: String,
}

impl StorageKeys {
    /// Build the key set from a common prefix (`auth_` by default).
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            access_token: format!("{prefix}access_token"),
            user_info: format!("{prefix}user_info"),
            is_admin: format!("{prefix}is_admin"),
            expires_at: format!("{prefix}expires_at"),
        }
    }

    /// All keys, in the order they are written.
    pub fn all(&self) -> [&str; 4] {
        [
            self.access_token.as_str(),
            self.user_info.as_str(),
            self.is_admin.as_str(),
            self.expires_at.as_str(),
        ]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_STORAGE_PREFIX)
    }
}

/// Auth client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base path of the backend auth endpoints, without trailing slash.
    pub api_base: String,
    /// Route the identity provider redirects back to.
    pub callback_path: String,
    /// Fallback navigation target after logout.
    pub app_root: String,
    pub storage_keys: StorageKeys,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            callback_path: DEFAULT_CALLBACK_PATH.to_owned(),
            app_root: DEFAULT_APP_ROOT.to_owned(),
            storage_keys: StorageKeys::default(),
        }
    }
}

impl AuthConfig {
    /// Build a config from a key lookup, using defaults for missing or blank
    /// values.
    ///
    /// Recognized keys: `PORTAL_AUTH_API_BASE`, `PORTAL_AUTH_CALLBACK_PATH`,
    /// `PORTAL_AUTH_APP_ROOT`, `PORTAL_AUTH_STORAGE_PREFIX`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base = get("PORTAL_AUTH_API_BASE")
            .map_or_else(|| DEFAULT_API_BASE.to_owned(), |v| v.trim_end_matches('/').to_owned());
        let callback_path = get("PORTAL_AUTH_CALLBACK_PATH").unwrap_or_else(|| DEFAULT_CALLBACK_PATH.to_owned());
        let app_root = get("PORTAL_AUTH_APP_ROOT").unwrap_or_else(|| DEFAULT_APP_ROOT.to_owned());
        let storage_keys = get("PORTAL_AUTH_STORAGE_PREFIX")
            .map_or_else(StorageKeys::default, |prefix| StorageKeys::with_prefix(&prefix));

        Self { api_base, callback_path, app_root, storage_keys }
    }

    /// Config captured from the build environment.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "PORTAL_AUTH_API_BASE" => option_env!("PORTAL_AUTH_API_BASE"),
                "PORTAL_AUTH_CALLBACK_PATH" => option_env!("PORTAL_AUTH_CALLBACK_PATH"),
                "PORTAL_AUTH_APP_ROOT" => option_env!("PORTAL_AUTH_APP_ROOT"),
                "PORTAL_AUTH_STORAGE_PREFIX" => option_env!("PORTAL_AUTH_STORAGE_PREFIX"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Full path for an auth endpoint, e.g. `endpoint("login-url")`.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.api_base)
    }

    /// Redirect URI the backend forwards to the identity provider.
    #[must_use]
    pub fn redirect_uri(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.callback_path)
    }
}
