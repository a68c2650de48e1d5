//! Run progress bar with live counters.

use leptos::prelude::*;

use crate::state::run::{RunPhase, RunState};

fn phase_label(phase: RunPhase) -> &'static str {
    match phase {
        RunPhase::Idle => "Idle",
        RunPhase::Streaming => "Running",
        RunPhase::Complete => "Complete",
        RunPhase::Failed => "Failed",
        RunPhase::Cancelled => "Cancelled",
    }
}

#[component]
pub fn RunProgress() -> impl IntoView {
    let run = expect_context::<RwSignal<RunState>>();

    view! {
        <div class="run-progress">
            <div class="run-progress__bar">
                <div
                    class="run-progress__fill"
                    style:width=move || format!("{}%", run.get().progress)
                ></div>
            </div>
            <span class="run-progress__label">
                {move || {
                    let state = run.get();
                    format!(
                        "{}: {}/{} rows, {} failed ({}%)",
                        phase_label(state.phase),
                        state.completed_rows(),
                        state.total_rows,
                        state.failed_rows(),
                        state.progress,
                    )
                }}
            </span>
            <Show when=move || run.get().error.is_some()>
                <span class="run-progress__error">
                    {move || run.get().error.unwrap_or_default()}
                </span>
            </Show>
        </div>
    }
}
