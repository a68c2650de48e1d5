//! Prompt routes — prompts and their versions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use shared::{CreatePrompt, CreatePromptVersion, VersionStatus};

use crate::routes::auth::AuthUser;
use crate::services::prompt::{self, PromptError};
use crate::services::project;
use crate::state::AppState;

fn error_response(err: &PromptError) -> Response {
    match err {
        PromptError::NotFound(_) => (StatusCode::NOT_FOUND, "prompt not found").into_response(),
        PromptError::VersionNotFound(_) => {
            (StatusCode::NOT_FOUND, "prompt version not found").into_response()
        }
        PromptError::UnknownStatus(s) => {
            tracing::error!(status = %s, "unknown version status in storage");
            (StatusCode::INTERNAL_SERVER_ERROR, "corrupt version status").into_response()
        }
        PromptError::Database(e) => {
            tracing::error!(error = %e, "prompt query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}

/// Confirm the project exists and belongs to the caller.
async fn check_project(state: &AppState, auth: &AuthUser, project_id: Uuid) -> Result<(), Response> {
    project::get(&state.pool, auth.user.id, project_id)
        .await
        .map(|_| ())
        .map_err(|_| (StatusCode::NOT_FOUND, "project not found").into_response())
}

/// `POST /api/projects/{id}/prompts`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreatePrompt>,
) -> Response {
    if let Err(resp) = check_project(&state, &auth, project_id).await {
        return resp;
    }
    match prompt::create(&state.pool, project_id, &payload.name).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/projects/{id}/prompts`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Response {
    if let Err(resp) = check_project(&state, &auth, project_id).await {
        return resp;
    }
    match prompt::list_by_project(&state.pool, project_id).await {
        Ok(prompts) => Json(prompts).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/prompts/{id}`
pub async fn delete(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match prompt::delete(&state.pool, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/prompts/{id}/versions`
pub async fn create_version(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prompt_id): Path<Uuid>,
    Json(payload): Json<CreatePromptVersion>,
) -> Response {
    match prompt::create_version(&state.pool, prompt_id, &payload).await {
        Ok(version) => (StatusCode::CREATED, Json(version)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/prompts/{id}/versions`
pub async fn list_versions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prompt_id): Path<Uuid>,
) -> Response {
    match prompt::list_versions(&state.pool, prompt_id).await {
        Ok(versions) => Json(versions).into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: VersionStatus,
}

/// `PUT /api/prompt-versions/{id}/status`
pub async fn set_version_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(version_id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Response {
    match prompt::set_version_status(&state.pool, version_id, payload.status).await {
        Ok(version) => Json(version).into_response(),
        Err(e) => error_response(&e),
    }
}
