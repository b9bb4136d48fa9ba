//! Query parameters the identity provider appends to the callback URL.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

/// Decoded `code` / `error` / `error_description` from a callback redirect.
///
/// Empty values are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match &*key {
                "code" => &mut params.code,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Whether this looks like an identity-provider redirect at all.
    pub fn is_callback(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }
}
