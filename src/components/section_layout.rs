//! Sidebar layout shared by the admin, HR, and candidate sections.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits inside `ProtectedRoute`, so a session always exists here. This layer
//! adds the role check: a user whose role the section does not admit is sent
//! to their own landing route. Child pages read the active [`Section`] from
//! context.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Outlet;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::mode_toggle::ModeToggle;
use crate::state::auth::AuthState;
use crate::state::session_store::BrowserSessionStore;
use crate::util::navigation::{LOGIN_ROUTE, Section, landing_route, nav_items};

#[component]
pub fn SectionLayout(section: Section) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<BrowserSessionStore>();
    let navigate = use_navigate();
    let pathname = use_location().pathname;
    provide_context(section);

    let navigate_home = navigate.clone();
    Effect::new(move || {
        let state = auth.get();
        if let Some(role) = state.role() {
            if !section.admits(role) {
                navigate_home(landing_route(role), NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        }
    });

    let role = move || auth.get().role().cloned().unwrap_or_default();
    let email = move || auth.get().user.map(|u| u.email).unwrap_or_default();

    let signing_out = RwSignal::new(false);
    let on_sign_out = move |_| {
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);
        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                store.sign_out().await;
                navigate(LOGIN_ROUTE, NavigateOptions::default());
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store, &navigate);
        }
    };

    let nav = move || {
        nav_items(section, &role())
            .iter()
            .map(|item| {
                let path = item.path;
                let class = move || {
                    if pathname.get().trim_end_matches('/') == path {
                        "section-nav__link section-nav__link--active"
                    } else {
                        "section-nav__link"
                    }
                };
                view! { <a href=path class=class>{item.label}</a> }
            })
            .collect_view()
    };

    view! {
        <div class="section-layout">
            <aside class="section-layout__sidebar">
                <div class="section-layout__brand">
                    <span class="section-layout__title">{section.title()}</span>
                    <span class="section-layout__badge">{move || role().label()}</span>
                </div>
                <nav class="section-nav">{nav}</nav>
                <div class="section-layout__footer">
                    <span class="section-layout__email">{email}</span>
                    <ModeToggle/>
                    <button
                        class="section-layout__sign-out"
                        type="button"
                        disabled=move || signing_out.get()
                        on:click=on_sign_out
                    >
                        "Sign out"
                    </button>
                </div>
            </aside>
            <main class="section-layout__content">
                <Outlet/>
            </main>
        </div>
    }
}
