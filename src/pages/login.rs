//! Email + password sign-in page.
//!
//! On success the visitor is sent to their role's landing route. Failures
//! show one banner at a time, replaced on every attempt.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::net::error::AuthError;

const MISSING_FIELDS: &str = "Enter both email and password.";

/// Error banner content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginFailure {
    pub heading: &'static str,
    pub message: String,
}

impl LoginFailure {
    fn input(message: &str) -> Self {
        Self { heading: "Login Failed", message: message.to_owned() }
    }
}

/// Banner for a failed sign-in; system failures get a different heading than
/// rejected credentials.
pub fn failure_banner(err: &AuthError) -> LoginFailure {
    let heading = if err.is_system() { "Something went wrong" } else { "Login Failed" };
    LoginFailure { heading, message: err.to_string() }
}

/// Trim the email and require both fields.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let failure = RwSignal::new(None::<LoginFailure>);
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let store = expect_context::<crate::state::session_store::BrowserSessionStore>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    // Pending sign-ins must not write into a disposed page.
    let alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
    let alive_cleanup = alive.clone();
    on_cleanup(move || alive_cleanup.store(false, std::sync::atomic::Ordering::Relaxed));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
            Ok(values) => values,
            Err(msg) => {
                failure.set(Some(LoginFailure::input(msg)));
                return;
            }
        };
        busy.set(true);
        failure.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            let alive = alive.clone();
            leptos::task::spawn_local(async move {
                let result = store.sign_in(&email_value, &password_value).await;
                if !alive.load(std::sync::atomic::Ordering::Relaxed) {
                    return;
                }
                match result {
                    Ok(user) => {
                        navigate(
                            crate::util::navigation::landing_route(&user.role),
                            leptos_router::NavigateOptions::default(),
                        );
                    }
                    Err(e) => failure.set(Some(failure_banner(&e))),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, password_value, &alive);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Welcome back"</h1>
                <p class="login-card__subtitle">"Enter your credentials to access your workspace."</p>
                <Show when=move || failure.get().is_some()>
                    <div class="login-error" role="alert">
                        <h3 class="login-error__heading">
                            {move || failure.get().map(|f| f.heading).unwrap_or_default()}
                        </h3>
                        <p class="login-error__message">
                            {move || failure.get().map(|f| f.message).unwrap_or_default()}
                        </p>
                    </div>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="email"
                        placeholder="name@company.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Verifying..." } else { "Sign In" }}
                    </button>
                </form>
                <p class="login-card__footer">
                    "New candidate? " <a href="/register">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
