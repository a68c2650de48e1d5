//! Evaluation runner — drives both models over a dataset and emits NDJSON
//! progress events.
//!
//! DESIGN
//! ======
//! The runner owns no HTTP concerns: it writes encoded event lines into an
//! mpsc channel and the route layer turns the receiver into a streaming
//! response body. A closed channel means the client went away, and the run
//! stops at the next send.
//!
//! ERROR HANDLING
//! ==============
//! One side failing does not fail the row — the failed side gets an error
//! placeholder with zero tokens so the comparison stays visible. Only when
//! both sides fail does the row become a `row_error` event, and the run
//! still continues with the next row.

#[cfg(test)]
#[path = "evaluate_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use shared::stream::{EvalEvent, encode_event};
use shared::{DatasetRow, EvalRequest, RowResult};

use crate::llm::{ChatModel, LlmError, ModelReply};
use crate::scoring::{pick_winner, token_cost, word_overlap_accuracy};

/// Pause between rows so the stream paces visibly in the dashboard.
const INTER_ROW_DELAY: Duration = Duration::from_millis(50);

/// Substitute the dataset question into a user prompt template.
///
/// The `{Question}` placeholder is replaced wherever it appears; templates
/// without it get the question appended so the model always sees it.
#[must_use]
pub fn render_user_prompt(template: &str, question: &str) -> String {
    if template.contains("{Question}") {
        template.replace("{Question}", question)
    } else if template.trim().is_empty() {
        question.to_owned()
    } else {
        format!("{template}\n\n{question}")
    }
}

fn reply_or_placeholder(model: &str, outcome: Result<ModelReply, LlmError>) -> ModelReply {
    match outcome {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!(model, error = %err, "model call failed, recording placeholder");
            ModelReply { text: format!("Error: {err}"), tokens: 0, latency_secs: 0.0 }
        }
    }
}

/// Evaluate one dataset row on both models in parallel.
///
/// # Errors
///
/// Returns a combined message only when both sides fail.
pub async fn evaluate_row(
    model_a: &Arc<dyn ChatModel>,
    model_b: &Arc<dyn ChatModel>,
    system_prompt: &str,
    user_prompt_template: &str,
    row: &DatasetRow,
) -> Result<RowResult, String> {
    let user_prompt = render_user_prompt(user_prompt_template, &row.question);

    let (outcome_a, outcome_b) = tokio::join!(
        model_a.chat(system_prompt, &user_prompt),
        model_b.chat(system_prompt, &user_prompt),
    );

    if let (Err(err_a), Err(err_b)) = (&outcome_a, &outcome_b) {
        return Err(format!("{}: {err_a}; {}: {err_b}", model_a.model(), model_b.model()));
    }

    let reply_a = reply_or_placeholder(model_a.model(), outcome_a);
    let reply_b = reply_or_placeholder(model_b.model(), outcome_b);

    let accuracy_a = word_overlap_accuracy(&reply_a.text, &row.expected_answer);
    let accuracy_b = word_overlap_accuracy(&reply_b.text, &row.expected_answer);
    let winner = pick_winner(model_a.model(), accuracy_a, model_b.model(), accuracy_b);

    Ok(RowResult {
        question: row.question.clone(),
        expected_answer: row.expected_answer.clone(),
        model_a_response: reply_a.text,
        model_a_latency: reply_a.latency_secs,
        model_a_tokens: reply_a.tokens,
        model_a_cost: token_cost(model_a.model(), reply_a.tokens),
        model_a_accuracy: accuracy_a,
        model_b_response: reply_b.text,
        model_b_latency: reply_b.latency_secs,
        model_b_tokens: reply_b.tokens,
        model_b_cost: token_cost(model_b.model(), reply_b.tokens),
        model_b_accuracy: accuracy_b,
        winner: winner.to_owned(),
    })
}

async fn send_event(tx: &mpsc::Sender<String>, event: &EvalEvent) -> bool {
    tx.send(encode_event(event)).await.is_ok()
}

/// Run a full evaluation, writing one encoded event line per send into `tx`.
///
/// Emits `start`, then `row_complete`/`row_error` per row, then `complete`.
/// Stops early without a terminal event if the receiver is dropped.
pub async fn run_evaluation(
    tx: mpsc::Sender<String>,
    model_a: Arc<dyn ChatModel>,
    model_b: Arc<dyn ChatModel>,
    req: EvalRequest,
) {
    let total_rows = u32::try_from(req.rows.len()).unwrap_or(u32::MAX);

    if !send_event(&tx, &EvalEvent::Start { total_rows }).await {
        return;
    }

    for (idx, row) in req.rows.iter().enumerate() {
        let row_number = u32::try_from(idx + 1).unwrap_or(u32::MAX);

        let event = match evaluate_row(
            &model_a,
            &model_b,
            &req.system_prompt,
            &req.user_prompt_template,
            row,
        )
        .await
        {
            Ok(result) => EvalEvent::RowComplete {
                row_number,
                total_rows,
                progress: (row_number * 100) / total_rows,
                result,
            },
            Err(error) => {
                tracing::warn!(row_number, error, "row failed on both models");
                EvalEvent::RowError { row_number, error }
            }
        };

        if !send_event(&tx, &event).await {
            tracing::debug!(row_number, "client disconnected, stopping run");
            return;
        }

        if row_number < total_rows {
            tokio::time::sleep(INTER_ROW_DELAY).await;
        }
    }

    let _ = send_event(&tx, &EvalEvent::Complete { total_rows }).await;
}
