//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Auth state lives apart from the session manager so components can bind to
//! it without pulling in storage or network concerns.

pub mod auth;
