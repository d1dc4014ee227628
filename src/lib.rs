//! # recruit-portal
//!
//! Leptos + WASM front-end for the recruiting workspace: super-admin, HR and
//! candidate sections behind a shared sign-in.
//!
//! The crate owns the client-side session lifecycle (`state::session_store`),
//! route protection (`components::protected_route`, `util::auth`) and the thin
//! HTTP clients it needs to talk to the REST backend and the auth provider.
//! Page bodies are placeholders; the backend owns the business logic.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

/// Browser entry point: installs logging and hydrates the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
