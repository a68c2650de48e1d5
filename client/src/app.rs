//! Application shell: routing and shared state provisioning.
//!
//! ARCHITECTURE
//! ============
//! Every shared slice lives in an `RwSignal` provided via context here, so
//! pages and components reach state by type instead of prop-drilling. On
//! mount, a stored token is revalidated against the server; until that
//! settles the route guard holds off on redirecting.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use shared::{EvaluationJob, Project};

use crate::components::layout::NavBar;
use crate::pages;
use crate::state::auth::AuthState;
use crate::state::crud::CrudState;
use crate::state::run::RunState;
use crate::util::persistence;

/// Currently selected project id, mirrored to localStorage.
#[derive(Clone, Copy)]
pub struct SelectedProject(pub RwSignal<Option<uuid::Uuid>>);

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let stored_token = persistence::load_token();
    let auth = RwSignal::new(AuthState::checking(stored_token.clone()));
    provide_context(auth);

    let mut projects = CrudState::<Project>::default();
    if let Some(cached) = persistence::load_projects() {
        projects.loaded(cached);
    }
    projects.select(persistence::load_selected_project());
    let projects = RwSignal::new(projects);
    provide_context(projects);
    provide_context(SelectedProject(RwSignal::new(
        projects.get_untracked().selected_id,
    )));

    let mut jobs = CrudState::<EvaluationJob>::default();
    if let Some(cached) = persistence::load_jobs() {
        jobs.loaded(cached);
    }
    provide_context(RwSignal::new(jobs));

    provide_context(RwSignal::new(RunState::default()));
    provide_context(RwSignal::new(persistence::load_api_keys()));

    // Revalidate the stored token once; an invalid one signs the user out.
    Effect::new(move || {
        let Some(token) = stored_token.clone() else {
            auth.update(AuthState::signed_out);
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_current_user(&token).await {
                Some(user) => auth.update(|a| a.signed_in(user, token.clone())),
                None => {
                    persistence::clear_session();
                    auth.update(AuthState::signed_out);
                }
            }
        });
    });

    view! {
        <Title text="Evalboard"/>
        <Router>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| "Not found.">
                    <Route path=path!("/login") view=pages::login::LoginPage/>
                    <Route path=path!("/") view=pages::dashboard::DashboardPage/>
                    <Route path=path!("/projects") view=pages::projects::ProjectsPage/>
                    <Route path=path!("/playground") view=pages::playground::PlaygroundPage/>
                    <Route path=path!("/jobs") view=pages::jobs::JobsPage/>
                    <Route path=path!("/metrics") view=pages::metrics::MetricsPage/>
                    <Route path=path!("/settings") view=pages::settings::SettingsPage/>
                </Routes>
            </main>
        </Router>
    }
}
