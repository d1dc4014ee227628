//! Wrapper that renders its children only for a signed-in visitor.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::util::auth::{GuardDecision, guard_decision, install_unauth_redirect};

/// Gate a route subtree behind an active session.
///
/// While startup restore runs this shows a spinner and never redirects, so a
/// reload on a protected page does not flash the login screen.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_unauth_redirect(auth, use_navigate());

    let decision = Memo::new(move |_| guard_decision(&auth.get()));

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Render
            fallback=move || {
                view! {
                    <Show when=move || decision.get() == GuardDecision::Loading>
                        <div class="route-loading">
                            <div class="route-loading__spinner"></div>
                        </div>
                    </Show>
                }
            }
        >
            {children()}
        </Show>
    }
}
