//! Dataset routes — upload, preview, and deletion.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use shared::DatasetRow;

use crate::routes::auth::AuthUser;
use crate::services::dataset::{self, DatasetError};
use crate::services::project;
use crate::state::AppState;

fn error_response(err: &DatasetError) -> Response {
    match err {
        DatasetError::NotFound(_) => (StatusCode::NOT_FOUND, "dataset not found").into_response(),
        DatasetError::Empty => {
            (StatusCode::UNPROCESSABLE_ENTITY, "dataset has no rows").into_response()
        }
        DatasetError::InvalidCsv { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
        }
        DatasetError::Database(e) => {
            tracing::error!(error = %e, "dataset query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}

/// Upload payload: a name plus either pre-parsed rows or raw CSV text.
#[derive(Debug, Deserialize)]
pub struct UploadPayload {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<DatasetRow>,
    #[serde(default)]
    pub csv: String,
}

/// `POST /api/projects/{id}/datasets`
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UploadPayload>,
) -> Response {
    if project::get(&state.pool, auth.user.id, project_id).await.is_err() {
        return (StatusCode::NOT_FOUND, "project not found").into_response();
    }

    let rows = if payload.rows.is_empty() {
        match dataset::parse_csv_rows(&payload.csv) {
            Ok(rows) => rows,
            Err(e) => return error_response(&e),
        }
    } else {
        payload.rows
    };

    match dataset::create(&state.pool, project_id, &payload.name, &rows).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/projects/{id}/datasets`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Response {
    if project::get(&state.pool, auth.user.id, project_id).await.is_err() {
        return (StatusCode::NOT_FOUND, "project not found").into_response();
    }
    match dataset::list_by_project(&state.pool, project_id).await {
        Ok(datasets) => Json(datasets).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/datasets/{id}`
pub async fn get_one(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match dataset::get(&state.pool, id).await {
        Ok(found) => Json(found).into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RowsQuery {
    pub limit: Option<i64>,
}

/// `GET /api/datasets/{id}/rows?limit=`
pub async fn rows(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<RowsQuery>,
) -> Response {
    // Existence check so a bad id is a 404 rather than an empty list.
    if let Err(e) = dataset::get(&state.pool, id).await {
        return error_response(&e);
    }
    match dataset::rows(&state.pool, id, query.limit).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/datasets/{id}`
pub async fn delete(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Response {
    match dataset::delete(&state.pool, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
