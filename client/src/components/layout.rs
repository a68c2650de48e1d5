//! Top navigation bar with the project selector and sign-out control.

use leptos::prelude::*;
use leptos_router::components::A;

use shared::Project;

use crate::app::SelectedProject;
use crate::state::auth::AuthState;
use crate::state::crud::CrudState;
use crate::util::persistence;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let projects = expect_context::<RwSignal<CrudState<Project>>>();
    let selected = expect_context::<SelectedProject>().0;

    let on_select = move |ev: leptos::ev::Event| {
        let raw = event_target_value(&ev);
        let id = raw.parse().ok();
        selected.set(id);
        projects.update(|p| p.select(id));
        persistence::save_selected_project(id);
    };

    let on_logout = move |_| {
        let token = auth.get_untracked().token.unwrap_or_default();
        leptos::task::spawn_local(async move {
            crate::net::api::logout(&token).await;
        });
        persistence::clear_session();
        auth.update(AuthState::signed_out);
    };

    view! {
        <Show when=move || auth.get().is_authenticated()>
            <nav class="nav-bar">
                <span class="nav-brand">"Evalboard"</span>
                <A href="/">"Dashboard"</A>
                <A href="/projects">"Projects"</A>
                <A href="/playground">"Playground"</A>
                <A href="/jobs">"Jobs"</A>
                <A href="/metrics">"Metrics"</A>
                <A href="/settings">"Settings"</A>
                <select class="nav-project-select" on:change=on_select>
                    <option value="" selected=move || selected.get().is_none()>
                        "Select project"
                    </option>
                    <For
                        each=move || projects.get().items
                        key=|p| p.id
                        children=move |p| {
                            let id = p.id;
                            view! {
                                <option
                                    value=id.to_string()
                                    selected=move || selected.get() == Some(id)
                                >
                                    {p.name.clone()}
                                </option>
                            }
                        }
                    />
                </select>
                <span class="nav-user">
                    {move || auth.get().user.map(|u| u.name).unwrap_or_default()}
                </span>
                <button class="nav-logout" on:click=on_logout>"Sign out"</button>
            </nav>
        </Show>
    }
}
