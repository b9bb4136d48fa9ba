//! Networking modules for the backend auth proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` abstracts the transport, `api` wraps each auth endpoint, and
//! `types` defines the JSON wire schema.

pub mod api;
pub mod http;
pub mod types;
