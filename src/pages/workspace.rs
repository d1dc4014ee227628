//! Placeholder body for every section route.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::state::auth::AuthState;
use crate::util::navigation::{Section, page_title};

#[component]
pub fn WorkspacePage() -> impl IntoView {
    let section = expect_context::<Section>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let pathname = use_location().pathname;

    let title = move || {
        let role = auth.get().role().cloned().unwrap_or_default();
        page_title(section, &role, pathname.get().trim_end_matches('/'))
    };

    view! {
        <section class="workspace-page">
            <h1 class="workspace-page__title">{title}</h1>
            <p class="workspace-page__body">"This workspace is served by the recruiting backend."</p>
        </section>
    }
}
