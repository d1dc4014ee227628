//! Candidate self-registration.
//!
//! Accounts are created directly with the auth provider under the
//! `candidate` role; the provider emails a confirmation code that the
//! verify page accepts.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Trim the email, require it, and enforce the minimum password length.
pub fn validate_registration(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Enter your email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Link to the code entry page with the email prefilled.
pub fn verify_link(email: &str) -> String {
    let encoded: String = email
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => char::from(b).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect();
    format!("/auth/verify?email={encoded}")
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let registered = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    let store = expect_context::<crate::state::session_store::BrowserSessionStore>();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, password_value) = match validate_registration(&email.get_untracked(), &password.get_untracked()) {
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
            leptos::task::spawn_local(async move {
                match store.provider().register(&email_value, &password_value).await {
                    Ok(()) => registered.set(Some(email_value)),
                    Err(e) => {
                        leptos::logging::warn!("registration failed: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <Show
                when=move || registered.get().is_some()
                fallback=move || {
                    view! {
                        <div class="login-card">
                            <h1>"Create Account"</h1>
                            <p class="login-card__subtitle">"Start your journey to your dream job."</p>
                            <Show when=move || error.get().is_some()>
                                <div class="login-error" role="alert">
                                    <h3 class="login-error__heading">"Registration Failed"</h3>
                                    <p class="login-error__message">{move || error.get().unwrap_or_default()}</p>
                                </div>
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
                                    class="login-input"
                                    type="password"
                                    placeholder="Password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                />
                                <p class="login-hint">"Must be at least 8 characters."</p>
                                <button class="login-button" type="submit" disabled=move || busy.get()>
                                    {move || if busy.get() { "Creating account..." } else { "Create Account" }}
                                </button>
                            </form>
                            <p class="login-card__footer">
                                "Already registered? " <a href="/login">"Sign in"</a>
                            </p>
                        </div>
                    }
                }
            >
                <div class="login-card">
                    <h1>"Verification Sent!"</h1>
                    <p class="login-card__subtitle">
                        "We've sent a verification code to "
                        <strong>{move || registered.get().unwrap_or_default()}</strong>
                        ". Please check your inbox to activate your account."
                    </p>
                    <a class="login-button" href=move || verify_link(&registered.get().unwrap_or_default())>
                        "Enter Verification Code"
                    </a>
                </div>
            </Show>
        </div>
    }
}
