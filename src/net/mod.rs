//! Networking modules for the REST backend and the auth provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the HTTP seam (browser fetch in production, scripted fakes
//! in tests). `auth_backend` and `auth_provider` are the two halves of
//! sign-in, `api` is the authenticated client page code uses, and `types`
//! and `error` define the wire schema and failure taxonomy.

pub mod api;
pub mod auth_backend;
pub mod auth_provider;
pub mod error;
pub mod transport;
pub mod types;
