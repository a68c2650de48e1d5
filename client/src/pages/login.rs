//! Login and registration page.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use shared::{LoginRequest, RegisterRequest};

use crate::state::auth::AuthState;
use crate::util::persistence;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let registering = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Already signed in? Straight to the dashboard.
    {
        let navigate = navigate.clone();
        Effect::new(move || {
            if auth.get().is_authenticated() {
                navigate("/", Default::default());
            }
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        if email_value.is_empty() || password_value.is_empty() {
            info.set("Enter email and password.".to_owned());
            return;
        }
        busy.set(true);
        info.set(String::new());

        let name_value = name.get().trim().to_owned();
        let is_registration = registering.get();
        leptos::task::spawn_local(async move {
            let outcome = if is_registration {
                crate::net::api::register(&RegisterRequest {
                    email: email_value,
                    password: password_value,
                    name: name_value,
                })
                .await
            } else {
                crate::net::api::login(&LoginRequest {
                    email: email_value,
                    password: password_value,
                })
                .await
            };
            match outcome {
                Ok(session) => {
                    persistence::save_session(&session.token, &session.user);
                    auth.update(|a| a.signed_in(session.user, session.token));
                }
                Err(e) => {
                    info.set(e);
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Evalboard"</h1>
                <p class="login-card__subtitle">
                    {move || if registering.get() { "Create an account" } else { "Sign in" }}
                </p>
                <form class="login-form" on:submit=on_submit>
                    <Show when=move || registering.get()>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Your name"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </Show>
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
                        placeholder="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if registering.get() { "Create account" } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <button
                    class="login-switch"
                    on:click=move |_| registering.update(|r| *r = !*r)
                >
                    {move || {
                        if registering.get() {
                            "Have an account? Sign in"
                        } else {
                            "New here? Create an account"
                        }
                    }}
                </button>
            </div>
        </div>
    }
}
