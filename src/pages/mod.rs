//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (input validation, pending
//! flags, redirects) and delegates session changes to the session store.

pub mod login;
pub mod register;
pub mod verify_email;
pub mod workspace;
