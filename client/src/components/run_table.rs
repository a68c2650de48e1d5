//! Side-by-side result table for a streamed run.

use leptos::prelude::*;

use crate::state::run::{RowOutcome, RunState};

fn short(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

#[component]
pub fn RunTable(model_a: Signal<String>, model_b: Signal<String>) -> impl IntoView {
    let run = expect_context::<RwSignal<RunState>>();
    // Hoisted out of the view so the closure can use a turbofish, which the
    // view macro would otherwise read as markup.
    let row_entries = move || run.get().rows.into_iter().collect::<Vec<_>>();

    view! {
        <table class="run-table">
            <thead>
                <tr>
                    <th>"#"</th>
                    <th>"Question"</th>
                    <th>{move || model_a.get()}</th>
                    <th>{move || model_b.get()}</th>
                    <th>"Winner"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=row_entries
                    key=|(row_number, _)| *row_number
                    children=move |(row_number, outcome)| match outcome {
                        RowOutcome::Done(result) => view! {
                            <tr class="run-table__row">
                                <td>{row_number}</td>
                                <td>{short(&result.question, 80)}</td>
                                <td>
                                    {short(&result.model_a_response, 120)}
                                    <span class="run-table__meta">
                                        {format!(
                                            " ({:.0}% · {} tok · {:.2}s)",
                                            result.model_a_accuracy * 100.0,
                                            result.model_a_tokens,
                                            result.model_a_latency,
                                        )}
                                    </span>
                                </td>
                                <td>
                                    {short(&result.model_b_response, 120)}
                                    <span class="run-table__meta">
                                        {format!(
                                            " ({:.0}% · {} tok · {:.2}s)",
                                            result.model_b_accuracy * 100.0,
                                            result.model_b_tokens,
                                            result.model_b_latency,
                                        )}
                                    </span>
                                </td>
                                <td class="run-table__winner">{result.winner}</td>
                            </tr>
                        }
                        .into_any(),
                        RowOutcome::Failed(error) => view! {
                            <tr class="run-table__row run-table__row--failed">
                                <td>{row_number}</td>
                                <td colspan="4" class="run-table__error">
                                    {format!("Row failed: {error}")}
                                </td>
                            </tr>
                        }
                        .into_any(),
                    }
                />
            </tbody>
        </table>
    }
}
