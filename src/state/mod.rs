//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` is the plain snapshot components read through a context signal;
//! `session_store` owns every mutation of it.

pub mod auth;
pub mod session_store;
