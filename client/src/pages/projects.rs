//! Projects page: create, rename, select, and delete projects, plus dataset
//! upload into the selected project.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use shared::{CreateProject, Dataset, Project, UpdateProject};

use crate::app::SelectedProject;
use crate::state::auth::AuthState;
use crate::state::crud::CrudState;
use crate::util::auth::install_unauth_redirect;
use crate::util::persistence;

#[component]
pub fn ProjectsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let projects = expect_context::<RwSignal<CrudState<Project>>>();
    let selected = expect_context::<SelectedProject>().0;
    let datasets = RwSignal::new(CrudState::<Dataset>::default());

    install_unauth_redirect(auth, use_navigate());

    let new_name = RwSignal::new(String::new());
    let new_description = RwSignal::new(String::new());
    let dataset_name = RwSignal::new(String::new());
    let dataset_csv = RwSignal::new(String::new());
    let notice = RwSignal::new(String::new());

    let token = move || auth.get_untracked().token.unwrap_or_default();

    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get().trim().to_owned();
        if name.is_empty() {
            return;
        }
        let payload = CreateProject { name, description: new_description.get() };
        let token = token();
        leptos::task::spawn_local(async move {
            match crate::net::api::create_project(&token, &payload).await {
                Ok(created) => {
                    projects.update(|p| p.upsert(created));
                    persistence::save_projects(&projects.get_untracked().items);
                    new_name.set(String::new());
                    new_description.set(String::new());
                }
                Err(e) => notice.set(e),
            }
        });
    };

    let on_delete = move |id: uuid::Uuid| {
        let token = token();
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_project(&token, id).await {
                Ok(()) => {
                    projects.update(|p| p.remove(id));
                    if selected.get_untracked() == Some(id) {
                        selected.set(None);
                        persistence::save_selected_project(None);
                    }
                    persistence::save_projects(&projects.get_untracked().items);
                }
                Err(e) => notice.set(e),
            }
        });
    };

    let on_rename = move |id: uuid::Uuid, name: String| {
        let token = token();
        let payload = UpdateProject { name: Some(name), description: None };
        leptos::task::spawn_local(async move {
            match crate::net::api::update_project(&token, id, &payload).await {
                Ok(updated) => {
                    projects.update(|p| p.upsert(updated));
                    persistence::save_projects(&projects.get_untracked().items);
                }
                Err(e) => notice.set(e),
            }
        });
    };

    // Fetch datasets whenever the selection changes.
    Effect::new(move || {
        let Some(project_id) = selected.get() else {
            datasets.update(|d| d.loaded(Vec::new()));
            return;
        };
        let Some(token) = auth.get().token.clone() else {
            return;
        };
        datasets.update(CrudState::begin_loading);
        leptos::task::spawn_local(async move {
            match crate::net::api::list_datasets(&token, project_id).await {
                Ok(list) => datasets.update(|d| d.loaded(list)),
                Err(e) => datasets.update(|d| d.failed(e)),
            }
        });
    });

    let on_upload = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(project_id) = selected.get_untracked() else {
            notice.set("Select a project first.".to_owned());
            return;
        };
        let name = dataset_name.get().trim().to_owned();
        let csv = dataset_csv.get();
        if name.is_empty() || csv.trim().is_empty() {
            notice.set("Dataset needs a name and CSV content.".to_owned());
            return;
        }
        let token = token();
        leptos::task::spawn_local(async move {
            match crate::net::api::upload_dataset_csv(&token, project_id, &name, &csv).await {
                Ok(created) => {
                    datasets.update(|d| d.upsert(created));
                    dataset_name.set(String::new());
                    dataset_csv.set(String::new());
                    notice.set(String::new());
                }
                Err(e) => notice.set(e),
            }
        });
    };

    view! {
        <section class="projects-page">
            <h2>"Projects"</h2>
            <Show when=move || !notice.get().is_empty()>
                <p class="error">{move || notice.get()}</p>
            </Show>
            <form class="project-form" on:submit=on_create>
                <input
                    placeholder="Project name"
                    prop:value=move || new_name.get()
                    on:input=move |ev| new_name.set(event_target_value(&ev))
                />
                <input
                    placeholder="Description"
                    prop:value=move || new_description.get()
                    on:input=move |ev| new_description.set(event_target_value(&ev))
                />
                <button type="submit">"Create"</button>
            </form>
            <ul class="project-list">
                <For
                    each=move || projects.get().items
                    key=|p| p.id
                    children=move |p| {
                        let id = p.id;
                        let name = RwSignal::new(p.name.clone());
                        view! {
                            <li class="project-list__item">
                                <input
                                    prop:value=move || name.get()
                                    on:input=move |ev| name.set(event_target_value(&ev))
                                    on:change=move |_| on_rename(id, name.get())
                                />
                                <span class="project-list__description">
                                    {p.description.clone()}
                                </span>
                                <button on:click=move |_| {
                                    selected.set(Some(id));
                                    projects.update(|ps| ps.select(Some(id)));
                                    persistence::save_selected_project(Some(id));
                                }>
                                    "Select"
                                </button>
                                <button class="danger" on:click=move |_| on_delete(id)>
                                    "Delete"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>

            <h3>"Datasets"</h3>
            <Show when=move || datasets.get().error.is_some()>
                <p class="error">{move || datasets.get().error.unwrap_or_default()}</p>
            </Show>
            <form class="dataset-form" on:submit=on_upload>
                <input
                    placeholder="Dataset name"
                    prop:value=move || dataset_name.get()
                    on:input=move |ev| dataset_name.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="question,expected_answer\nWhat is 2+2?,4"
                    prop:value=move || dataset_csv.get()
                    on:input=move |ev| dataset_csv.set(event_target_value(&ev))
                ></textarea>
                <button type="submit">"Upload CSV"</button>
            </form>
            <ul class="dataset-list">
                <For
                    each=move || datasets.get().items
                    key=|d| d.id
                    children=move |d| {
                        view! {
                            <li class="dataset-list__item">
                                <span>{d.name.clone()}</span>
                                <span class="dataset-list__count">
                                    {format!("{} rows", d.row_count)}
                                </span>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
