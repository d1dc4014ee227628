//! Light/dark theme preference.
//!
//! Reads the stored choice (falling back to the system color scheme), applies
//! it as the `dark` class plus a `data-theme` attribute on `<html>`, and
//! persists toggles.
//!
//! TRADE-OFFS
//! ==========
//! Preference persistence is best-effort browser-only behavior; SSR paths
//! safely no-op to keep server rendering deterministic.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use super::storage::KeyValueStore;

pub const THEME_STORAGE_KEY: &str = "recruit_portal.theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Stored theme, else the system preference, else light.
pub fn read_preference(store: &impl KeyValueStore) -> Theme {
    store
        .get(THEME_STORAGE_KEY)
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_else(system_preference)
}

fn system_preference() -> Theme {
    #[cfg(feature = "hydrate")]
    {
        let prefers_dark = web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map_or(false, |mq| mq.matches());
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Theme::Light
    }
}

/// Reflect `theme` on the `<html>` element.
pub fn apply(theme: Theme) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) {
            let _ = el.set_attribute("data-theme", theme.as_str());
            let _ = el.class_list().toggle_with_force("dark", theme == Theme::Dark);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = theme;
    }
}

/// Flip the theme, apply it, and persist the new choice.
pub fn toggle(store: &impl KeyValueStore, current: Theme) -> Theme {
    let next = current.flipped();
    apply(next);
    if let Err(e) = store.set(THEME_STORAGE_KEY, next.as_str()) {
        leptos::logging::warn!("theme preference not saved: {e}");
    }
    next
}
