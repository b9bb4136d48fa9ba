//! Session lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` encodes the persisted entries, `manager` performs the backend
//! round-trips and owns the session, `callback` parses the provider redirect,
//! and `flow` drives the auth store from manager outcomes.

pub mod callback;
pub mod flow;
pub mod manager;
pub mod store;
