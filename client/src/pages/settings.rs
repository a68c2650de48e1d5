//! Settings page: provider API keys, kept in localStorage only.
//!
//! Keys ride along on evaluation requests and are never persisted
//! server-side.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;
use crate::util::persistence::{self, ApiKeys};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let api_keys = expect_context::<RwSignal<ApiKeys>>();

    install_unauth_redirect(auth, use_navigate());

    let openai = RwSignal::new(api_keys.get_untracked().openai_key);
    let deepseek = RwSignal::new(api_keys.get_untracked().deepseek_key);
    let anthropic = RwSignal::new(api_keys.get_untracked().anthropic_key);
    let saved = RwSignal::new(false);

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let keys = ApiKeys {
            openai_key: openai.get().trim().to_owned(),
            deepseek_key: deepseek.get().trim().to_owned(),
            anthropic_key: anthropic.get().trim().to_owned(),
        };
        persistence::save_api_keys(&keys);
        api_keys.set(keys);
        saved.set(true);
    };

    view! {
        <section class="settings-page">
            <h2>"Settings"</h2>
            <p>"API keys stay in this browser and are sent only with evaluation runs."</p>
            <form class="settings-form" on:submit=on_save>
                <label>
                    "OpenAI API key"
                    <input
                        type="password"
                        prop:value=move || openai.get()
                        on:input=move |ev| {
                            openai.set(event_target_value(&ev));
                            saved.set(false);
                        }
                    />
                </label>
                <label>
                    "DeepSeek API key"
                    <input
                        type="password"
                        prop:value=move || deepseek.get()
                        on:input=move |ev| {
                            deepseek.set(event_target_value(&ev));
                            saved.set(false);
                        }
                    />
                </label>
                <label>
                    "Anthropic API key"
                    <input
                        type="password"
                        prop:value=move || anthropic.get()
                        on:input=move |ev| {
                            anthropic.set(event_target_value(&ev));
                            saved.set(false);
                        }
                    />
                </label>
                <button type="submit">"Save keys"</button>
                <Show when=move || saved.get()>
                    <span class="settings-saved">"Saved."</span>
                </Show>
            </form>
        </section>
    }
}
