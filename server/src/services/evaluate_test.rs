use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;

use shared::stream::{EvalEvent, decode_event};
use shared::{DatasetRow, EvalRequest};

use super::*;

// =============================================================
// Mock model
// =============================================================

/// Scripted chat model: answers from a fixed list, cycling by call count.
struct ScriptedModel {
    name: String,
    replies: Vec<Result<ModelReply, String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(name: &str, replies: Vec<Result<ModelReply, String>>) -> Arc<dyn ChatModel> {
        Arc::new(Self { name: name.to_owned(), replies, calls: AtomicUsize::new(0) })
    }

    fn always(name: &str, text: &str) -> Arc<dyn ChatModel> {
        Self::new(
            name,
            vec![Ok(ModelReply { text: text.to_owned(), tokens: 10, latency_secs: 0.25 })],
        )
    }

    fn failing(name: &str) -> Arc<dyn ChatModel> {
        Self::new(name, vec![Err("connection refused".to_owned())])
    }
}

#[async_trait::async_trait]
impl ChatModel for ScriptedModel {
    fn model(&self) -> &str {
        &self.name
    }

    async fn chat(&self, _system: &str, _user: &str) -> Result<ModelReply, LlmError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst) % self.replies.len();
        self.replies[idx]
            .clone()
            .map_err(LlmError::ApiRequest)
    }
}

fn request(rows: Vec<DatasetRow>) -> EvalRequest {
    EvalRequest {
        system_prompt: "You are a terse assistant.".to_owned(),
        user_prompt_template: "Answer: {Question}".to_owned(),
        rows,
        model_a: "gpt-4o-mini".to_owned(),
        model_b: "deepseek-chat".to_owned(),
        openai_key: "sk-test".to_owned(),
        deepseek_key: "sk-test".to_owned(),
        anthropic_key: String::new(),
    }
}

fn row(question: &str, expected: &str) -> DatasetRow {
    DatasetRow { question: question.to_owned(), expected_answer: expected.to_owned() }
}

async fn collect_events(
    model_a: Arc<dyn ChatModel>,
    model_b: Arc<dyn ChatModel>,
    req: EvalRequest,
) -> Vec<EvalEvent> {
    let (tx, mut rx) = mpsc::channel(32);
    let run = tokio::spawn(run_evaluation(tx, model_a, model_b, req));

    let mut events = Vec::new();
    while let Some(line) = rx.recv().await {
        events.push(decode_event(line.trim_end()).expect("valid event line"));
    }
    run.await.expect("runner task");
    events
}

// =============================================================
// Prompt rendering
// =============================================================

#[test]
fn placeholder_is_substituted() {
    assert_eq!(render_user_prompt("Q: {Question}", "what is 2+2?"), "Q: what is 2+2?");
}

#[test]
fn question_is_appended_when_placeholder_missing() {
    let rendered = render_user_prompt("Answer briefly.", "what is 2+2?");
    assert!(rendered.starts_with("Answer briefly."));
    assert!(rendered.ends_with("what is 2+2?"));
}

#[test]
fn empty_template_yields_bare_question() {
    assert_eq!(render_user_prompt("  ", "q"), "q");
}

// =============================================================
// Full runs
// =============================================================

#[tokio::test]
async fn two_row_run_streams_framed_results() {
    let model_a = ScriptedModel::always("gpt-4o-mini", "the answer is 4");
    let model_b = ScriptedModel::always("deepseek-chat", "four");

    let events =
        collect_events(model_a, model_b, request(vec![row("2+2?", "4"), row("3+3?", "6")])).await;

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], EvalEvent::Start { total_rows: 2 });
    assert_eq!(events[3], EvalEvent::Complete { total_rows: 2 });

    let EvalEvent::RowComplete { row_number, total_rows, progress, result } = &events[1] else {
        panic!("expected row_complete, got {:?}", events[1]);
    };
    assert_eq!(*row_number, 1);
    assert_eq!(*total_rows, 2);
    assert_eq!(*progress, 50);
    assert!(!result.model_a_response.is_empty());
    assert!(!result.model_b_response.is_empty());
    assert!(!result.winner.is_empty());

    let EvalEvent::RowComplete { progress, .. } = &events[2] else {
        panic!("expected row_complete, got {:?}", events[2]);
    };
    assert_eq!(*progress, 100);
}

#[tokio::test]
async fn accuracy_and_winner_favor_the_matching_side() {
    let model_a = ScriptedModel::always("gpt-4o-mini", "4");
    let model_b = ScriptedModel::always("deepseek-chat", "I cannot say");

    let events = collect_events(model_a, model_b, request(vec![row("2+2?", "4")])).await;

    let EvalEvent::RowComplete { result, .. } = &events[1] else {
        panic!("expected row_complete");
    };
    assert!((result.model_a_accuracy - 1.0).abs() < f64::EPSILON);
    assert!(result.model_b_accuracy.abs() < f64::EPSILON);
    assert_eq!(result.winner, "gpt-4o-mini");
    assert!(result.model_a_cost > 0.0);
}

#[tokio::test]
async fn one_side_failing_still_completes_the_row() {
    let model_a = ScriptedModel::always("gpt-4o-mini", "4");
    let model_b = ScriptedModel::failing("deepseek-chat");

    let events = collect_events(model_a, model_b, request(vec![row("2+2?", "4")])).await;

    let EvalEvent::RowComplete { result, .. } = &events[1] else {
        panic!("expected row_complete, got {:?}", events[1]);
    };
    assert_eq!(result.model_b_tokens, 0);
    assert!(result.model_b_response.starts_with("Error:"));
    assert_eq!(result.winner, "gpt-4o-mini");
}

#[tokio::test]
async fn both_sides_failing_emits_row_error_and_continues() {
    let model_a = ScriptedModel::failing("gpt-4o-mini");
    let model_b = ScriptedModel::failing("deepseek-chat");

    let events =
        collect_events(model_a, model_b, request(vec![row("2+2?", "4"), row("3+3?", "6")])).await;

    assert_eq!(events.len(), 4);
    assert!(matches!(events[1], EvalEvent::RowError { row_number: 1, .. }));
    assert!(matches!(events[2], EvalEvent::RowError { row_number: 2, .. }));
    assert_eq!(events[3], EvalEvent::Complete { total_rows: 2 });
}

#[tokio::test]
async fn empty_dataset_frames_immediately() {
    let model_a = ScriptedModel::always("gpt-4o-mini", "x");
    let model_b = ScriptedModel::always("deepseek-chat", "x");

    let events = collect_events(model_a, model_b, request(Vec::new())).await;
    assert_eq!(
        events,
        vec![EvalEvent::Start { total_rows: 0 }, EvalEvent::Complete { total_rows: 0 }]
    );
}

#[tokio::test]
async fn dropped_receiver_stops_the_run() {
    let model_a = ScriptedModel::always("gpt-4o-mini", "x");
    let model_b = ScriptedModel::always("deepseek-chat", "x");

    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    // Returns promptly instead of grinding through every row.
    run_evaluation(tx, model_a, model_b, request(vec![row("q", "a"); 100])).await;
}
