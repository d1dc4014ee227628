//! One-time code entry that activates a freshly registered account.

#[cfg(test)]
#[path = "verify_email_test.rs"]
mod verify_email_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

pub const CODE_LEN: usize = 6;

/// Keep digits only, capped at the code length.
pub fn normalize_code_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).take(CODE_LEN).collect()
}

pub fn validate_verification(email: &str, code: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    let code = code.trim();
    if email.is_empty() || code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("Enter your email and the 6-digit code sent to it.");
    }
    Ok((email.to_owned(), code.to_owned()))
}

#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let query = use_query_map();
    let email = RwSignal::new(query.get_untracked().get("email").unwrap_or_default());
    let code = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let verified = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let store = expect_context::<crate::state::session_store::BrowserSessionStore>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, code_value) = match validate_verification(&email.get_untracked(), &code.get_untracked()) {
            Ok(values) => values,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match store.provider().verify_signup(&email_value, &code_value).await {
                    Ok(()) => {
                        verified.set(true);
                        set_timeout(
                            move || navigate(crate::util::navigation::LOGIN_ROUTE, leptos_router::NavigateOptions::default()),
                            std::time::Duration::from_secs(2),
                        );
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, code_value);
        }
    };

    view! {
        <div class="login-page">
            <Show
                when=move || verified.get()
                fallback=move || {
                    view! {
                        <div class="login-card">
                            <h1>"Verify Account"</h1>
                            <p class="login-card__subtitle">"Enter the 6-digit code sent to your email."</p>
                            <Show when=move || error.get().is_some()>
                                <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                            </Show>
                            <form class="login-form" on:submit=on_submit>
                                <input
                                    class="login-input"
                                    type="email"
                                    placeholder="you@example.com"
                                    prop:value=move || email.get()
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                />
                                <input
                                    class="login-input login-input--code"
                                    type="text"
                                    inputmode="numeric"
                                    maxlength="6"
                                    placeholder="123456"
                                    prop:value=move || code.get()
                                    on:input=move |ev| code.set(normalize_code_input(&event_target_value(&ev)))
                                />
                                <button class="login-button" type="submit" disabled=move || busy.get()>
                                    "Verify Email"
                                </button>
                            </form>
                        </div>
                    }
                }
            >
                <div class="login-card">
                    <h1>"Verified!"</h1>
                    <p class="login-card__subtitle">"Your account is active. Redirecting to login..."</p>
                    <a href="/login">"Go to Login Now"</a>
                </div>
            </Show>
        </div>
    }
}
