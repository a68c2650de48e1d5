//! Jobs page: run history for the selected project.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use shared::{EvaluationEntry, EvaluationJob};

use crate::app::SelectedProject;
use crate::state::auth::AuthState;
use crate::state::crud::CrudState;
use crate::util::auth::install_unauth_redirect;
use crate::util::persistence;

#[component]
pub fn JobsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let jobs = expect_context::<RwSignal<CrudState<EvaluationJob>>>();
    let selected = expect_context::<SelectedProject>().0;
    // Seed from the cached snapshot of the last inspected job, if any.
    let entries: RwSignal<Vec<EvaluationEntry>> =
        RwSignal::new(persistence::load_evaluations().unwrap_or_default());
    let notice = RwSignal::new(String::new());

    install_unauth_redirect(auth, use_navigate());

    let fetch_page = move |page: u32| {
        let Some(project_id) = selected.get_untracked() else {
            return;
        };
        let Some(token) = auth.get_untracked().token else {
            return;
        };
        jobs.update(CrudState::begin_loading);
        leptos::task::spawn_local(async move {
            match crate::net::api::list_jobs(&token, project_id, page, 10).await {
                Ok(page) => {
                    persistence::save_jobs(&page.items);
                    jobs.update(|j| j.loaded_page(page));
                }
                Err(e) => jobs.update(|j| j.failed(e)),
            }
        });
    };

    Effect::new(move || {
        let _ = selected.get();
        let _ = auth.get();
        fetch_page(1);
    });

    let on_inspect = move |id: uuid::Uuid| {
        let Some(token) = auth.get_untracked().token else {
            return;
        };
        jobs.update(|j| j.select(Some(id)));
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_job_entries(&token, id).await {
                Ok(list) => {
                    persistence::save_evaluations(&list);
                    entries.set(list);
                }
                Err(e) => notice.set(e),
            }
        });
    };

    let on_delete = move |id: uuid::Uuid| {
        let Some(token) = auth.get_untracked().token else {
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_job(&token, id).await {
                Ok(()) => {
                    jobs.update(|j| j.remove(id));
                    entries.set(Vec::new());
                    persistence::save_jobs(&jobs.get_untracked().items);
                }
                Err(e) => notice.set(e),
            }
        });
    };

    let total_pages = move || {
        let state = jobs.get();
        let total = u32::try_from(state.total).unwrap_or(0);
        total.div_ceil(10).max(1)
    };

    view! {
        <section class="jobs-page">
            <h2>"Jobs"</h2>
            <Show when=move || !notice.get().is_empty()>
                <p class="error">{move || notice.get()}</p>
            </Show>
            <Show when=move || jobs.get().error.is_some()>
                <p class="error">{move || jobs.get().error.unwrap_or_default()}</p>
            </Show>
            <table class="jobs-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Models"</th>
                        <th>"Status"</th>
                        <th>"Rows"</th>
                        <th>"Failed"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || jobs.get().items
                        key=|job| job.id
                        children=move |job| {
                            let id = job.id;
                            view! {
                                <tr class:selected=move || {
                                    jobs.get().selected_id == Some(id)
                                }>
                                    <td>{job.name.clone()}</td>
                                    <td>{format!("{} vs {}", job.model_a, job.model_b)}</td>
                                    <td>{job.status.as_str()}</td>
                                    <td>{format!("{}/{}", job.completed_entries, job.total_entries)}</td>
                                    <td>{job.failed_entries}</td>
                                    <td>
                                        <button on:click=move |_| on_inspect(id)>"Rows"</button>
                                        <button class="danger" on:click=move |_| on_delete(id)>
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            <div class="pager">
                <button
                    disabled=move || jobs.get().page <= 1
                    on:click=move |_| fetch_page(jobs.get_untracked().page - 1)
                >
                    "Prev"
                </button>
                <span>{move || format!("page {} of {}", jobs.get().page, total_pages())}</span>
                <button
                    disabled=move || jobs.get().page >= total_pages()
                    on:click=move |_| fetch_page(jobs.get_untracked().page + 1)
                >
                    "Next"
                </button>
            </div>
            <Show when=move || !entries.get().is_empty()>
                <h3>"Rows"</h3>
                <table class="entries-table">
                    <thead>
                        <tr>
                            <th>"#"</th>
                            <th>"Question"</th>
                            <th>"A accuracy"</th>
                            <th>"B accuracy"</th>
                            <th>"Winner"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || entries.get()
                            key=|e| e.id
                            children=move |e| {
                                view! {
                                    <tr class:failed=e.failed>
                                        <td>{e.row_number}</td>
                                        <td>{e.result.question.clone()}</td>
                                        <td>{format!("{:.0}%", e.result.model_a_accuracy * 100.0)}</td>
                                        <td>{format!("{:.0}%", e.result.model_b_accuracy * 100.0)}</td>
                                        <td>
                                            {if e.failed {
                                                e.error.clone().unwrap_or_default()
                                            } else {
                                                e.result.winner.clone()
                                            }}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}
