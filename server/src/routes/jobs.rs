//! Job routes — run history and per-row entries.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::routes::projects::PageQuery;
use crate::services::job::{self, JobError};
use crate::services::project;
use crate::state::AppState;

pub(crate) fn error_response(err: &JobError) -> Response {
    match err {
        JobError::NotFound(_) => (StatusCode::NOT_FOUND, "job not found").into_response(),
        JobError::AlreadyTerminal(_) => {
            (StatusCode::CONFLICT, "job already finished").into_response()
        }
        JobError::UnknownStatus(s) => {
            tracing::error!(status = %s, "unknown job status in storage");
            (StatusCode::INTERNAL_SERVER_ERROR, "corrupt job status").into_response()
        }
        JobError::Database(e) => {
            tracing::error!(error = %e, "job query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}

/// `GET /api/projects/{id}/jobs?page=&limit=`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Response {
    if project::get(&state.pool, auth.user.id, project_id).await.is_err() {
        return (StatusCode::NOT_FOUND, "project not found").into_response();
    }
    match job::list_by_project(&state.pool, project_id, query.page, query.limit).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/jobs/{id}`
pub async fn get_one(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match job::get(&state.pool, id).await {
        Ok(found) => Json(found).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/jobs/{id}/entries`
pub async fn entries(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match job::entries(&state.pool, id).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/jobs/{id}/cancel`
pub async fn cancel(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match job::cancel(&state.pool, id).await {
        Ok(cancelled) => Json(cancelled).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/jobs/{id}`
pub async fn delete(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match job::delete(&state.pool, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
