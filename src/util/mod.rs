//! Browser seams and Leptos glue.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage`, `navigation` and `clock` are the injectable collaborators the
//! session manager depends on; `auth` binds the auth store to Leptos.

pub mod auth;
pub mod clock;
pub mod navigation;
pub mod storage;
