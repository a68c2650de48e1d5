//! Dashboard page: project overview with recent jobs.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use shared::{EvaluationJob, Project};

use crate::app::SelectedProject;
use crate::state::auth::AuthState;
use crate::state::crud::CrudState;
use crate::util::auth::install_unauth_redirect;
use crate::util::persistence;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let projects = expect_context::<RwSignal<CrudState<Project>>>();
    let jobs = expect_context::<RwSignal<CrudState<EvaluationJob>>>();
    let selected = expect_context::<SelectedProject>().0;

    install_unauth_redirect(auth, use_navigate());

    // Refresh projects, then jobs for the selected project.
    Effect::new(move || {
        let state = auth.get();
        let Some(token) = state.token.clone() else {
            return;
        };
        if !state.is_authenticated() {
            return;
        }
        projects.update(CrudState::begin_loading);
        leptos::task::spawn_local(async move {
            match crate::net::api::list_projects(&token, 1, shared::MAX_PAGE_LIMIT).await {
                Ok(page) => {
                    persistence::save_projects(&page.items);
                    projects.update(|p| p.loaded_page(page));
                }
                Err(e) => projects.update(|p| p.failed(e)),
            }
        });
    });

    Effect::new(move || {
        let Some(project_id) = selected.get() else {
            return;
        };
        let Some(token) = auth.get().token.clone() else {
            return;
        };
        jobs.update(CrudState::begin_loading);
        leptos::task::spawn_local(async move {
            match crate::net::api::list_jobs(&token, project_id, 1, 10).await {
                Ok(page) => {
                    persistence::save_jobs(&page.items);
                    jobs.update(|j| j.loaded_page(page));
                }
                Err(e) => jobs.update(|j| j.failed(e)),
            }
        });
    });

    view! {
        <section class="dashboard">
            <h2>"Overview"</h2>
            <Show when=move || projects.get().error.is_some()>
                <p class="error">{move || projects.get().error.unwrap_or_default()}</p>
            </Show>
            <div class="dashboard-cards">
                <div class="dashboard-card">
                    <span class="dashboard-card__value">
                        {move || projects.get().total}
                    </span>
                    <span class="dashboard-card__label">"Projects"</span>
                </div>
                <div class="dashboard-card">
                    <span class="dashboard-card__value">{move || jobs.get().total}</span>
                    <span class="dashboard-card__label">"Recent jobs"</span>
                </div>
            </div>
            <h3>"Recent jobs"</h3>
            <Show
                when=move || selected.get().is_some()
                fallback=|| view! { <p>"Select a project to see its runs."</p> }
            >
                <ul class="job-list">
                    <For
                        each=move || jobs.get().items
                        key=|job| job.id
                        children=move |job| {
                            view! {
                                <li class="job-list__item">
                                    <span class="job-list__name">{job.name.clone()}</span>
                                    <span class="job-list__models">
                                        {format!("{} vs {}", job.model_a, job.model_b)}
                                    </span>
                                    <span class="job-list__status">
                                        {job.status.as_str()}
                                    </span>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </section>
    }
}
