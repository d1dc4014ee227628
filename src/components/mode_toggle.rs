//! Light/dark theme toggle button.

use leptos::prelude::*;

use crate::util::storage::LocalStorage;
use crate::util::theme::{self, Theme};

#[component]
pub fn ModeToggle() -> impl IntoView {
    let current = RwSignal::new(Theme::Light);

    // Effects only run in the browser, so SSR output stays deterministic.
    Effect::new(move || {
        let stored = theme::read_preference(&LocalStorage);
        theme::apply(stored);
        current.set(stored);
    });

    let on_toggle = move |_| current.set(theme::toggle(&LocalStorage, current.get_untracked()));

    view! {
        <button class="mode-toggle" type="button" title="Toggle theme" on:click=on_toggle>
            {move || if current.get() == Theme::Dark { "Light mode" } else { "Dark mode" }}
        </button>
    }
}
