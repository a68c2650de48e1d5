//! Metrics routes — aggregate views over stored runs.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::metrics::{self, MetricsError};
use crate::services::project;
use crate::state::AppState;

fn error_response(err: &MetricsError) -> Response {
    match err {
        MetricsError::NotFound(_) => (StatusCode::NOT_FOUND, "job not found").into_response(),
        MetricsError::Database(e) => {
            tracing::error!(error = %e, "metrics query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}

/// `GET /api/jobs/{id}/metrics`
pub async fn for_job(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match metrics::for_job(&state.pool, id).await {
        Ok(found) => Json(found).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/projects/{id}/metrics`
pub async fn for_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Response {
    if project::get(&state.pool, auth.user.id, project_id).await.is_err() {
        return (StatusCode::NOT_FOUND, "project not found").into_response();
    }
    match metrics::for_project(&state.pool, project_id).await {
        Ok(all) => Json(all).into_response(),
        Err(e) => error_response(&e),
    }
}
