//! Streaming evaluation route.
//!
//! ARCHITECTURE
//! ============
//! The handler spawns the evaluation runner on its own task and bridges the
//! runner's mpsc channel into the response body. Errors that occur before the
//! run starts (missing API keys) still arrive as stream events, so consumers
//! handle exactly one wire shape. Dropping the response drops the receiver,
//! which stops the runner at its next send.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;

use shared::EvalRequest;
use shared::stream::{EvalEvent, encode_event};

use crate::llm::build_model_client;
use crate::routes::auth::AuthUser;
use crate::services::evaluate::run_evaluation;
use crate::state::AppState;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

fn ndjson_response(body: Body) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE), (header::CACHE_CONTROL, "no-cache")],
        body,
    )
        .into_response()
}

fn single_error_stream(message: String) -> Response {
    ndjson_response(Body::from(encode_event(&EvalEvent::Error { error: message })))
}

/// `POST /api/evaluate/rows` — run both models over the submitted rows and
/// stream NDJSON progress events.
pub async fn run_rows(
    State(_state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<EvalRequest>,
) -> Response {
    let model_a = match build_model_client(&req.model_a, &req.openai_key, &req.deepseek_key) {
        Ok(client) => client,
        Err(e) => return single_error_stream(e.to_string()),
    };
    let model_b = match build_model_client(&req.model_b, &req.openai_key, &req.deepseek_key) {
        Ok(client) => client,
        Err(e) => return single_error_stream(e.to_string()),
    };

    let (tx, rx) = mpsc::channel::<String>(32);
    tokio::spawn(run_evaluation(tx, model_a, model_b, req));

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (Ok::<_, std::convert::Infallible>(line), rx))
    });

    ndjson_response(Body::from_stream(stream))
}
