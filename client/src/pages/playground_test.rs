use super::*;

use shared::RowResult;
use shared::stream::EvalEvent;

fn completed_run() -> RunState {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 1 });
    run.apply(EvalEvent::RowComplete {
        row_number: 1,
        total_rows: 1,
        progress: 100,
        result: RowResult { question: "Q1".to_owned(), winner: "gpt-4o-mini".to_owned(), ..RowResult::default() },
    });
    run.apply(EvalEvent::Complete { total_rows: 1 });
    run
}

#[test]
fn completed_run_is_stored_with_the_entered_name() {
    let project = uuid::Uuid::new_v4();
    let payload = completed_store_request(project, " nightly check ", "gpt-4o-mini", "deepseek-chat", &completed_run())
        .expect("completed run persists");

    assert_eq!(payload.project_id, project);
    assert_eq!(payload.name, "nightly check");
    assert_eq!(payload.model_a, "gpt-4o-mini");
    assert_eq!(payload.model_b, "deepseek-chat");
    assert_eq!(payload.rows.len(), 1);
    assert_eq!(payload.rows[0].question, "Q1");
}

#[test]
fn blank_name_falls_back_to_model_pairing() {
    let payload = completed_store_request(uuid::Uuid::new_v4(), "  ", "gpt-4o-mini", "deepseek-chat", &completed_run())
        .expect("completed run persists");
    assert_eq!(payload.name, "gpt-4o-mini vs deepseek-chat");
}

#[test]
fn unfinished_runs_are_not_stored() {
    let mut streaming = RunState::default();
    streaming.start_streaming();
    assert!(completed_store_request(uuid::Uuid::new_v4(), "", "a", "b", &streaming).is_none());

    let mut failed = RunState::default();
    failed.start_streaming();
    failed.apply(EvalEvent::Error { error: "boom".to_owned() });
    assert!(completed_store_request(uuid::Uuid::new_v4(), "", "a", "b", &failed).is_none());

    let mut cancelled = RunState::default();
    cancelled.start_streaming();
    cancelled.cancelled();
    assert!(completed_store_request(uuid::Uuid::new_v4(), "", "a", "b", &cancelled).is_none());
}
