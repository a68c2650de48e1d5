//! Metrics page: per-job aggregates for the selected project.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use shared::JobMetrics;

use crate::app::SelectedProject;
use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn MetricsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let selected = expect_context::<SelectedProject>().0;
    let metrics = RwSignal::new(Vec::<JobMetrics>::new());
    let error = RwSignal::new(String::new());

    install_unauth_redirect(auth, use_navigate());

    Effect::new(move || {
        let Some(project_id) = selected.get() else {
            metrics.set(Vec::new());
            return;
        };
        let Some(token) = auth.get().token.clone() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_project_metrics(&token, project_id).await {
                Ok(list) => {
                    error.set(String::new());
                    metrics.set(list);
                }
                Err(e) => error.set(e),
            }
        });
    });

    view! {
        <section class="metrics-page">
            <h2>"Metrics"</h2>
            <Show when=move || !error.get().is_empty()>
                <p class="error">{move || error.get()}</p>
            </Show>
            <Show
                when=move || selected.get().is_some()
                fallback=|| view! { <p>"Select a project to see metrics."</p> }
            >
                <table class="metrics-table">
                    <thead>
                        <tr>
                            <th>"Job"</th>
                            <th>"Rows"</th>
                            <th>"Avg accuracy A"</th>
                            <th>"Avg accuracy B"</th>
                            <th>"Wins A"</th>
                            <th>"Wins B"</th>
                            <th>"Tokens"</th>
                            <th>"Cost"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || metrics.get()
                            key=|m| m.job_id
                            children=move |m| {
                                view! {
                                    <tr>
                                        <td class="metrics-table__id">
                                            {m.job_id.to_string()}
                                        </td>
                                        <td>{m.row_count}</td>
                                        <td>{format!("{:.1}%", m.avg_accuracy_a * 100.0)}</td>
                                        <td>{format!("{:.1}%", m.avg_accuracy_b * 100.0)}</td>
                                        <td>{m.wins_a}</td>
                                        <td>{m.wins_b}</td>
                                        <td>{m.total_tokens}</td>
                                        <td>{format!("${:.4}", m.total_cost)}</td>
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
