//! Navigation and current-location seams.
//!
//! The session manager never touches `window.location` directly: redirects go
//! through a [`Navigator`] and the callback query is read from a
//! [`CurrentLocation`]. `BrowserWindow` implements both for the hydrate build.

/// Full-page navigation and in-place URL rewriting.
pub trait Navigator {
    /// Leave the app and load `url`.
    fn navigate(&self, url: &str);
    /// Replace the visible URL without reloading or adding a history entry.
    fn replace_url(&self, url: &str);
}

/// Read-only view of the page's current URL.
pub trait CurrentLocation {
    /// Scheme, host and port, e.g. `https://portal.example.edu`.
    fn origin(&self) -> String;
    /// Path component, e.g. `/oauth2/callback`.
    fn path(&self) -> String;
    /// Query string including the leading `?`, or empty.
    fn query(&self) -> String;
}

/// `window.location` / `window.history` for the browser build.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserWindow;

#[cfg(feature = "hydrate")]
impl BrowserWindow {
    fn location_part(read: impl Fn(&web_sys::Location) -> Result<String, wasm_bindgen::JsValue>) -> String {
        let Some(window) = web_sys::window() else {
            return String::new();
        };
        match read(&window.location()) {
            Ok(value) => value,
            Err(e) => {
                leptos::logging::warn!("location read failed: {e:?}");
                String::new()
            }
        }
    }
}

#[cfg(feature = "hydrate")]
impl Navigator for BrowserWindow {
    fn navigate(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            leptos::logging::warn!("navigation to {url} failed: {e:?}");
        }
    }

    fn replace_url(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let result = window
            .history()
            .and_then(|history| history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url)));
        if let Err(e) = result {
            leptos::logging::warn!("history rewrite to {url} failed: {e:?}");
        }
    }
}

#[cfg(feature = "hydrate")]
impl CurrentLocation for BrowserWindow {
    fn origin(&self) -> String {
        Self::location_part(web_sys::Location::origin)
    }

    fn path(&self) -> String {
        Self::location_part(web_sys::Location::pathname)
    }

    fn query(&self) -> String {
        Self::location_part(web_sys::Location::search)
    }
}
