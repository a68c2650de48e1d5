use super::*;

fn result(winner: &str) -> RowResult {
    RowResult {
        question: "q".to_owned(),
        expected_answer: "a".to_owned(),
        model_a_response: "ra".to_owned(),
        model_a_tokens: 10,
        model_a_cost: 0.001,
        model_a_accuracy: 1.0,
        model_b_response: "rb".to_owned(),
        model_b_tokens: 20,
        model_b_cost: 0.002,
        model_b_accuracy: 0.5,
        winner: winner.to_owned(),
        ..RowResult::default()
    }
}

fn row_complete(row_number: u32, total_rows: u32, winner: &str) -> EvalEvent {
    EvalEvent::RowComplete {
        row_number,
        total_rows,
        progress: (row_number * 100) / total_rows,
        result: result(winner),
    }
}

#[test]
fn full_run_reaches_complete_with_full_progress() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 3 });
    run.apply(row_complete(1, 3, "a-model"));
    run.apply(row_complete(2, 3, "a-model"));
    run.apply(row_complete(3, 3, "b-model"));
    run.apply(EvalEvent::Complete { total_rows: 3 });

    assert_eq!(run.phase, RunPhase::Complete);
    assert_eq!(run.progress, 100);
    assert_eq!(run.completed_rows(), 3);
    assert_eq!(run.failed_rows(), 0);
    assert!(run.is_terminal());
}

#[test]
fn duplicate_row_event_overwrites_not_appends() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 2 });
    run.apply(row_complete(1, 2, "a-model"));
    run.apply(row_complete(1, 2, "b-model"));

    assert_eq!(run.rows.len(), 1);
    assert_eq!(run.completed_rows(), 1);
    let RowOutcome::Done(r) = &run.rows[&1] else { panic!("expected done") };
    assert_eq!(r.winner, "b-model");
}

#[test]
fn progress_never_moves_backwards() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 2 });
    run.apply(row_complete(2, 2, "a-model"));
    assert_eq!(run.progress, 100);

    // Late delivery of the earlier row must not regress the bar.
    run.apply(row_complete(1, 2, "a-model"));
    assert_eq!(run.progress, 100);
}

#[test]
fn row_error_is_surfaced_and_advances_progress() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 2 });
    run.apply(EvalEvent::RowError { row_number: 1, error: "both sides failed".to_owned() });

    assert_eq!(run.failed_rows(), 1);
    assert_eq!(run.progress, 50);
    assert_eq!(run.phase, RunPhase::Streaming);
}

#[test]
fn terminal_error_sets_failed_phase() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Error { error: "missing API key".to_owned() });

    assert_eq!(run.phase, RunPhase::Failed);
    assert_eq!(run.error.as_deref(), Some("missing API key"));
    assert!(run.is_terminal());
}

#[test]
fn running_totals_sum_both_sides() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 2 });
    run.apply(row_complete(1, 2, "a-model"));
    run.apply(row_complete(2, 2, "b-model"));

    assert_eq!(run.total_tokens(), 60);
    assert!((run.total_cost() - 0.006).abs() < 1e-12);
    assert_eq!(run.win_counts("a-model"), (1, 1));
}

#[test]
fn cancel_only_applies_mid_stream() {
    let mut run = RunState::default();
    run.start_streaming();
    run.cancelled();
    assert_eq!(run.phase, RunPhase::Cancelled);

    let mut done = RunState::default();
    done.start_streaming();
    done.apply(EvalEvent::Complete { total_rows: 0 });
    done.cancelled();
    assert_eq!(done.phase, RunPhase::Complete);
}

#[test]
fn skipped_lines_are_counted_without_state_damage() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 1 });
    run.skip_line();
    run.apply(row_complete(1, 1, "a-model"));
    run.apply(EvalEvent::Complete { total_rows: 1 });

    assert_eq!(run.skipped_lines, 1);
    assert_eq!(run.phase, RunPhase::Complete);
    assert_eq!(run.completed_rows(), 1);
}

#[test]
fn start_streaming_resets_previous_run() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 1 });
    run.apply(row_complete(1, 1, "a-model"));
    run.apply(EvalEvent::Complete { total_rows: 1 });

    run.start_streaming();
    assert_eq!(run.phase, RunPhase::Streaming);
    assert!(run.rows.is_empty());
    assert_eq!(run.progress, 0);
}

#[test]
fn collected_results_skip_failed_rows() {
    let mut run = RunState::default();
    run.start_streaming();
    run.apply(EvalEvent::Start { total_rows: 3 });
    run.apply(row_complete(1, 3, "a-model"));
    run.apply(EvalEvent::RowError { row_number: 2, error: "x".to_owned() });
    run.apply(row_complete(3, 3, "a-model"));

    assert_eq!(run.collected_results().len(), 2);
}
