//! # portal-auth
//!
//! Browser-side authentication client for the portal single-page app.
//!
//! The client redirects users to the campus identity provider, hands the
//! returned authorization code to the backend for exchange, keeps the
//! resulting session in `localStorage`, and mirrors auth status into an
//! observable store that Leptos components bind to.
//!
//! Browser collaborators (storage, navigation, location, HTTP, clock) sit
//! behind small traits. The `hydrate` feature supplies `web-sys`/`gloo-net`
//! implementations; native builds get in-memory ones so the session rules can
//! be exercised without a DOM.

pub mod config;
pub mod error;
pub mod net;
pub mod session;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::AuthConfig;
pub use error::AuthError;
pub use session::flow::AuthFlow;
pub use session::manager::{LoginOutcome, SessionManager};
pub use state::auth::{AuthState, AuthStore, SessionUser, Subscription};

/// Install the panic hook and console logger for the browser build.
///
/// Safe to call more than once; only the first logger registration wins.
#[cfg(feature = "hydrate")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
}
