//! Persisted session entries: encoding, expiry, self-healing.
//!
//! DESIGN
//! ======
//! A session is four independent storage entries (token, user JSON, admin
//! JSON boolean, expiry in epoch milliseconds). They are valid only as a set.
//! Reads check expiry first, before any other entry is trusted; an expired,
//! partial or unparsable set is deleted on the spot and reported as absent.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::rc::Rc;

use crate::config::StorageKeys;
use crate::net::types::UserIdentity;
use crate::util::storage::{KeyValueStore, StorageError};

/// A complete, unexpired persisted session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredSession {
    pub access_token: String,
    pub user: UserIdentity,
    pub is_admin: bool,
    /// Absolute expiry, milliseconds since the Unix epoch.
    pub expires_at: i64,
}

/// Why a stored entry set could not be trusted. Healed internally, never
/// returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum StorageCorruption {
    #[error("missing entry {0}")]
    Missing(String),
    #[error("unparsable entry {key}: {reason}")]
    Unparsable { key: String, reason: String },
}

/// Why a session could not be persisted. Nothing is left behind either way.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("session encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Write(#[from] StorageError),
}

enum Observed {
    Absent,
    Expired(i64),
    Valid(StoredSession),
}

/// Reads and writes the session entries in a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// Load the session as of `now_ms`.
    ///
    /// Returns `None` when nothing is stored, and also when the entries are
    /// expired, partial or unparsable; in those cases every entry is removed.
    pub fn load(&self, now_ms: i64) -> Option<StoredSession> {
        match self.observe(now_ms) {
            Ok(Observed::Absent) => None,
            Ok(Observed::Expired(expires_at)) => {
                leptos::logging::log!("session expired at {expires_at} (now {now_ms}); clearing");
                self.clear();
                None
            }
            Ok(Observed::Valid(session)) => Some(session),
            Err(e) => {
                leptos::logging::warn!("stored session corrupt ({e}); clearing");
                self.clear();
                None
            }
        }
    }

    /// Write all four entries, or none.
    ///
    /// # Errors
    ///
    /// [`SaveError::Encode`] if the user record cannot be encoded (nothing is
    /// written); [`SaveError::Write`] if storage refuses an entry, after the
    /// entries already written have been removed again.
    pub fn save(&self, session: &StoredSession) -> Result<(), SaveError> {
        let user = serde_json::to_string(&session.user)?;
        let is_admin = serde_json::to_string(&session.is_admin)?;
        let expires_at = session.expires_at.to_string();
        let entries = [
            (self.keys.access_token.as_str(), session.access_token.as_str()),
            (self.keys.user_info.as_str(), user.as_str()),
            (self.keys.is_admin.as_str(), is_admin.as_str()),
            (self.keys.expires_at.as_str(), expires_at.as_str()),
        ];
        for (key, value) in entries {
            if let Err(e) = self.storage.set(key, value) {
                self.clear();
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Remove all four entries.
    pub fn clear(&self) {
        for key in self.keys.all() {
            self.storage.remove(key);
        }
    }

    fn observe(&self, now_ms: i64) -> Result<Observed, StorageCorruption> {
        let token = self.storage.get(&self.keys.access_token);
        let user = self.storage.get(&self.keys.user_info);
        let is_admin = self.storage.get(&self.keys.is_admin);
        let expires_at = self.storage.get(&self.keys.expires_at);

        if token.is_none() && user.is_none() && is_admin.is_none() && expires_at.is_none() {
            return Ok(Observed::Absent);
        }

        let expires_at = require(&self.keys.expires_at, expires_at)?;
        let expires_at: i64 = expires_at.trim().parse().map_err(|e: std::num::ParseIntError| {
            StorageCorruption::Unparsable { key: self.keys.expires_at.clone(), reason: e.to_string() }
        })?;
        if now_ms > expires_at {
            return Ok(Observed::Expired(expires_at));
        }

        let access_token = require(&self.keys.access_token, token.filter(|t| !t.is_empty()))?;
        let user: UserIdentity = parse_json(&self.keys.user_info, require(&self.keys.user_info, user)?)?;
        let is_admin: bool = parse_json(&self.keys.is_admin, require(&self.keys.is_admin, is_admin)?)?;

        Ok(Observed::Valid(StoredSession { access_token, user, is_admin, expires_at }))
    }
}

fn require(key: &str, value: Option<String>) -> Result<String, StorageCorruption> {
    value.ok_or_else(|| StorageCorruption::Missing(key.to_owned()))
}

fn parse_json<T: serde::de::DeserializeOwned>(key: &str, raw: String) -> Result<T, StorageCorruption> {
    serde_json::from_str(&raw)
        .map_err(|e| StorageCorruption::Unparsable { key: key.to_owned(), reason: e.to_string() })
}
