//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render app chrome and gating wrappers while reading shared
//! auth state from Leptos context providers.

pub mod mode_toggle;
pub mod protected_route;
pub mod section_layout;
