//! Wire DTOs for the backend auth proxy.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's camelCase JSON. Every response carries a
//! `success` flag; fields that are only present on success are optional so a
//! failure body still deserializes and its `error` message can be surfaced.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Identity claims resolved by the backend.
///
/// Also the persisted `user_info` entry, so the serialized field names are
/// part of the storage layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Campus user id (Andrew ID).
    #[serde(rename = "andrewId")]
    pub id: String,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "givenName", default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
}

impl UserIdentity {
    /// Drop an empty `givenName`; the backend sends `""` when the claim is absent.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.given_name.as_deref().is_some_and(|g| g.trim().is_empty()) {
            self.given_name = None;
        }
        self
    }
}

/// `GET login-url` response.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUrlResponse {
    #[serde(default)]
    pub success: bool,
    pub login_url: Option<String>,
}

/// `POST callback` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub code: String,
    pub redirect_uri: String,
}

/// `POST callback` response. On failure only `success` and `error` are set.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    #[serde(default)]
    pub success: bool,
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub is_admin: bool,
    pub user: Option<UserIdentity>,
    pub error: Option<String>,
}

/// Generic `{success, error}` envelope used for error bodies and `GET me`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
}

/// `GET logout-url` response.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutUrlResponse {
    #[serde(default)]
    pub success: bool,
    pub logout_url: Option<String>,
}

/// `POST check-admin` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminRequest {
    pub andrew_id: String,
}

/// `POST check-admin` response.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_admin: bool,
    pub error: Option<String>,
}
