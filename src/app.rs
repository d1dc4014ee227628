//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{ParentRoute, Redirect, Route, Router, Routes},
};

use crate::components::{protected_route::ProtectedRoute, section_layout::SectionLayout};
use crate::config::ClientConfig;
use crate::net::api::{ApiClient, BrowserApiClient};
use crate::net::transport::FetchTransport;
use crate::pages::{
    login::LoginPage, register::RegisterPage, verify_email::VerifyEmailPage, workspace::WorkspacePage,
};
use crate::state::session_store::SessionStore;
use crate::util::navigation::{DEFAULT_LANDING_ROUTE, LOGIN_ROUTE, Section};
use crate::util::storage::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Owns the single session store, mirrors it into a reactive `AuthState`
/// signal for the view layer, and kicks off the startup restore.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    let store = SessionStore::new(&config, FetchTransport, LocalStorage);
    let api: BrowserApiClient = ApiClient::new(&config.api_base_url, FetchTransport, store.clone());

    let auth = RwSignal::new(store.snapshot());
    let subscription = store.subscribe(move |state| {
        auth.try_set(state.clone());
    });
    let cleanup_store = store.clone();
    on_cleanup(move || cleanup_store.unsubscribe(subscription));

    provide_context(auth);
    provide_context(store.clone());
    provide_context(api);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move { store.restore().await });
    #[cfg(not(feature = "hydrate"))]
    drop(store);

    view! {
        <Stylesheet id="leptos" href="/pkg/recruit-portal.css"/>
        <Title text="Recruit Portal"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("verify")) view=VerifyEmailPage/>

                <ParentRoute path=StaticSegment("admin") view=AdminSection>
                    <Route path=StaticSegment("") view=WorkspacePage/>
                    <Route path=StaticSegment("companies") view=WorkspacePage/>
                    <Route path=StaticSegment("users") view=WorkspacePage/>
                    <Route path=StaticSegment("access") view=WorkspacePage/>
                </ParentRoute>

                <ParentRoute path=StaticSegment("hr") view=HrSection>
                    <Route path=StaticSegment("dashboard") view=WorkspacePage/>
                    <Route path=StaticSegment("talent") view=WorkspacePage/>
                    <Route path=StaticSegment("upload") view=WorkspacePage/>
                    <Route path=StaticSegment("jobs") view=WorkspacePage/>
                    <Route path=(StaticSegment("jobs"), StaticSegment("new")) view=WorkspacePage/>
                    <Route path=(StaticSegment("jobs"), StaticSegment("edit"), ParamSegment("id")) view=WorkspacePage/>
                    <Route path=StaticSegment("match") view=WorkspacePage/>
                    <Route path=StaticSegment("history") view=WorkspacePage/>
                    <Route path=StaticSegment("profile") view=WorkspacePage/>
                    <Route path=StaticSegment("admin") view=WorkspacePage/>
                </ParentRoute>

                <ParentRoute path=StaticSegment("candidate") view=CandidateSection>
                    <Route path=StaticSegment("dashboard") view=WorkspacePage/>
                    <Route path=StaticSegment("practice") view=WorkspacePage/>
                    <Route path=StaticSegment("interviews") view=WorkspacePage/>
                    <Route path=StaticSegment("leaderboard") view=WorkspacePage/>
                </ParentRoute>

                <Route path=StaticSegment("dashboard") view=|| view! { <Redirect path=DEFAULT_LANDING_ROUTE/> }/>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=LOGIN_ROUTE/> }/>
            </Routes>
        </Router>
    }
}

#[component]
fn AdminSection() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <SectionLayout section=Section::Admin/>
        </ProtectedRoute>
    }
}

#[component]
fn HrSection() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <SectionLayout section=Section::Hr/>
        </ProtectedRoute>
    }
}

#[component]
fn CandidateSection() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <SectionLayout section=Section::Candidate/>
        </ProtectedRoute>
    }
}
