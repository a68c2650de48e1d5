//! Project routes — owner-scoped CRUD.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use shared::{CreateProject, UpdateProject};

use crate::routes::auth::AuthUser;
use crate::services::project::{self, ProjectError};
use crate::state::AppState;

/// `page`/`limit` query parameters shared by paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn error_response(err: &ProjectError) -> Response {
    match err {
        ProjectError::NotFound(_) => (StatusCode::NOT_FOUND, "project not found").into_response(),
        ProjectError::Database(e) => {
            tracing::error!(error = %e, "project query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}

/// `POST /api/projects`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProject>,
) -> Response {
    match project::create(&state.pool, auth.user.id, &payload).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/projects?page=&limit=`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Response {
    match project::list(&state.pool, auth.user.id, query.page, query.limit).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/projects/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    match project::get(&state.pool, auth.user.id, id).await {
        Ok(found) => Json(found).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `PUT /api/projects/{id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProject>,
) -> Response {
    match project::update(&state.pool, auth.user.id, id, &payload).await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/projects/{id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    match project::delete(&state.pool, auth.user.id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
