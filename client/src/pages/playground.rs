//! Playground page: configure and stream an A/B evaluation run.
//!
//! ARCHITECTURE
//! ============
//! The run button fetches the chosen dataset's rows, opens the NDJSON stream,
//! and folds each event into the shared `RunState`. Cancel aborts the fetch
//! through the run handle, which the server observes as a closed body. A
//! completed run is persisted as a job automatically; a store failure is
//! logged, never shown, since the results are still on screen.

#[cfg(test)]
#[path = "playground_test.rs"]
mod tests;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use shared::{Dataset, EvalRequest, StoreResultsRequest};

use crate::app::SelectedProject;
use crate::components::progress::RunProgress;
use crate::components::run_table::RunTable;
use crate::net::eval_stream::{RunHandle, stream_evaluation};
use crate::state::auth::AuthState;
use crate::state::crud::CrudState;
use crate::state::run::{RunPhase, RunState};
use crate::util::auth::install_unauth_redirect;
use crate::util::persistence::ApiKeys;

const MODEL_CHOICES: &[&str] = &["gpt-4o-mini", "gpt-4o", "deepseek-chat"];

/// Build the persist request for a finished run. `None` unless the run
/// actually reached `Complete`; the entered name falls back to "A vs B".
fn completed_store_request(
    project_id: uuid::Uuid,
    entered_name: &str,
    model_a: &str,
    model_b: &str,
    state: &RunState,
) -> Option<StoreResultsRequest> {
    if state.phase != RunPhase::Complete {
        return None;
    }
    let trimmed = entered_name.trim();
    let name = if trimmed.is_empty() {
        format!("{model_a} vs {model_b}")
    } else {
        trimmed.to_owned()
    };
    Some(StoreResultsRequest {
        project_id,
        prompt_version: None,
        name,
        model_a: model_a.to_owned(),
        model_b: model_b.to_owned(),
        rows: state.collected_results(),
    })
}

#[component]
pub fn PlaygroundPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let selected = expect_context::<SelectedProject>().0;
    let run = expect_context::<RwSignal<RunState>>();
    let api_keys = expect_context::<RwSignal<ApiKeys>>();

    install_unauth_redirect(auth, use_navigate());

    let datasets = RwSignal::new(CrudState::<Dataset>::default());
    let dataset_id = RwSignal::new(None::<uuid::Uuid>);
    let system_prompt = RwSignal::new("You are a concise assistant.".to_owned());
    let user_template = RwSignal::new("{Question}".to_owned());
    let model_a = RwSignal::new(MODEL_CHOICES[0].to_owned());
    let model_b = RwSignal::new("deepseek-chat".to_owned());
    let run_name = RwSignal::new(String::new());
    let notice = RwSignal::new(String::new());
    // AbortController is not Send, so the handle needs local storage.
    let handle = StoredValue::new_local(RunHandle::default());

    Effect::new(move || {
        let Some(project_id) = selected.get() else {
            return;
        };
        let Some(token) = auth.get().token.clone() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::net::api::list_datasets(&token, project_id).await {
                Ok(list) => datasets.update(|d| d.loaded(list)),
                Err(e) => datasets.update(|d| d.failed(e)),
            }
        });
    });

    // Abort any in-flight run when the page unmounts.
    on_cleanup(move || handle.get_value().cancel());

    let on_run = move |_| {
        if run.get_untracked().phase == RunPhase::Streaming {
            return;
        }
        let Some(project_id) = selected.get_untracked() else {
            notice.set("Choose a project first.".to_owned());
            return;
        };
        let Some(dataset) = dataset_id.get_untracked() else {
            notice.set("Choose a dataset first.".to_owned());
            return;
        };
        let token = auth.get_untracked().token.unwrap_or_default();
        let keys = api_keys.get_untracked();
        let req_base = EvalRequest {
            system_prompt: system_prompt.get_untracked(),
            user_prompt_template: user_template.get_untracked(),
            rows: Vec::new(),
            model_a: model_a.get_untracked(),
            model_b: model_b.get_untracked(),
            openai_key: keys.openai_key,
            deepseek_key: keys.deepseek_key,
            anthropic_key: keys.anthropic_key,
        };

        notice.set(String::new());
        run.update(RunState::start_streaming);
        let new_handle = RunHandle::new();
        handle.set_value(new_handle.clone());

        leptos::task::spawn_local(async move {
            let rows = match crate::net::api::fetch_dataset_rows(&token, dataset, None).await {
                Ok(rows) => rows,
                Err(e) => {
                    run.update(|r| {
                        r.apply(shared::stream::EvalEvent::Error { error: e });
                    });
                    return;
                }
            };
            let req = EvalRequest { rows, ..req_base };

            let outcome = stream_evaluation(
                &token,
                &req,
                &new_handle,
                move |event| run.update(|r| r.apply(event)),
                move || run.update(RunState::skip_line),
            )
            .await;

            run.update(|r| {
                if let Err(e) = outcome {
                    if !r.is_terminal() {
                        r.apply(shared::stream::EvalEvent::Error { error: e });
                    }
                } else {
                    // Stream closed without a terminal event: treat as cancel.
                    r.cancelled();
                }
            });

            // Fire-and-forget persist of a completed run. Failures are
            // logged, not shown; the results stay on screen either way.
            if let Some(payload) = completed_store_request(
                project_id,
                &run_name.get_untracked(),
                &model_a.get_untracked(),
                &model_b.get_untracked(),
                &run.get_untracked(),
            ) {
                match crate::net::api::store_results(&token, &payload).await {
                    Ok(job) => leptos::logging::log!("stored run {}", job.id),
                    Err(e) => leptos::logging::error!("storing run failed: {e}"),
                }
            }
        });
    };

    let on_cancel = move |_| {
        handle.get_value().cancel();
        run.update(RunState::cancelled);
    };

    view! {
        <section class="playground">
            <h2>"Playground"</h2>
            <Show when=move || !notice.get().is_empty()>
                <p class="notice">{move || notice.get()}</p>
            </Show>
            <div class="playground-config">
                <label>
                    "Dataset"
                    <select on:change=move |ev| {
                        dataset_id.set(event_target_value(&ev).parse().ok());
                    }>
                        <option value="">"Choose a dataset"</option>
                        <For
                            each=move || datasets.get().items
                            key=|d| d.id
                            children=move |d| {
                                view! {
                                    <option value=d.id.to_string()>
                                        {format!("{} ({} rows)", d.name, d.row_count)}
                                    </option>
                                }
                            }
                        />
                    </select>
                </label>
                <label>
                    "System prompt"
                    <textarea
                        prop:value=move || system_prompt.get()
                        on:input=move |ev| system_prompt.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label>
                    "User prompt template ({Question} is replaced per row)"
                    <textarea
                        prop:value=move || user_template.get()
                        on:input=move |ev| user_template.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label>
                    "Model A"
                    <select on:change=move |ev| model_a.set(event_target_value(&ev))>
                        {MODEL_CHOICES
                            .iter()
                            .map(|m| view! { <option value=*m selected=*m == "gpt-4o-mini">{*m}</option> })
                            .collect_view()}
                    </select>
                </label>
                <label>
                    "Model B"
                    <select on:change=move |ev| model_b.set(event_target_value(&ev))>
                        {MODEL_CHOICES
                            .iter()
                            .map(|m| view! { <option value=*m selected=*m == "deepseek-chat">{*m}</option> })
                            .collect_view()}
                    </select>
                </label>
            </div>
            <div class="playground-actions">
                <button
                    on:click=on_run
                    disabled=move || run.get().phase == RunPhase::Streaming
                >
                    "Run evaluation"
                </button>
                <button
                    on:click=on_cancel
                    disabled=move || run.get().phase != RunPhase::Streaming
                >
                    "Cancel"
                </button>
                <input
                    placeholder="Run name (optional, used when the run is saved)"
                    prop:value=move || run_name.get()
                    on:input=move |ev| run_name.set(event_target_value(&ev))
                />
            </div>
            <RunProgress/>
            <Show when=move || run.get().phase == RunPhase::Complete>
                <p class="run-summary">
                    {move || {
                        let state = run.get();
                        let (wins_a, wins_b) = state.win_counts(&model_a.get());
                        format!(
                            "Wins: {} {wins_a}, {} {wins_b}. {} tokens, ${:.4} total.",
                            model_a.get(),
                            model_b.get(),
                            state.total_tokens(),
                            state.total_cost(),
                        )
                    }}
                </p>
            </Show>
            <RunTable model_a=model_a.into() model_b=model_b.into()/>
        </section>
    }
}
