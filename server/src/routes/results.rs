//! Results routes — persist a finished streamed run and list stored runs.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use shared::StoreResultsRequest;

use crate::routes::auth::AuthUser;
use crate::routes::projects::PageQuery;
use crate::services::job;
use crate::services::project;
use crate::state::AppState;

/// `POST /api/evaluation-results/store`
pub async fn store(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<StoreResultsRequest>,
) -> Response {
    if project::get(&state.pool, auth.user.id, payload.project_id).await.is_err() {
        return (StatusCode::NOT_FOUND, "project not found").into_response();
    }
    match job::store_results(&state.pool, &payload).await {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(e) => crate::routes::jobs::error_response(&e),
    }
}

/// `GET /api/evaluation-results/project/{id}?page=&limit=`
///
/// Stored runs are jobs, so this is the job listing under the results path
/// earlier clients call.
pub async fn list_for_project(
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
        Err(e) => crate::routes::jobs::error_response(&e),
    }
}
