//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! All API endpoints live under `/api` and require a bearer token except
//! registration and login. The compiled dashboard bundle is served as static
//! files at `/`, so one binary carries both the API and the SPA.

pub mod auth;
pub mod datasets;
pub mod evaluate;
pub mod jobs;
pub mod metrics;
pub mod projects;
pub mod prompts;
pub mod results;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get_one).put(projects::update).delete(projects::delete),
        )
        .route(
            "/api/projects/{id}/prompts",
            get(prompts::list).post(prompts::create),
        )
        .route("/api/prompts/{id}", axum::routing::delete(prompts::delete))
        .route(
            "/api/prompts/{id}/versions",
            get(prompts::list_versions).post(prompts::create_version),
        )
        .route("/api/prompt-versions/{id}/status", put(prompts::set_version_status))
        .route(
            "/api/projects/{id}/datasets",
            get(datasets::list).post(datasets::upload),
        )
        .route("/api/datasets/{id}", get(datasets::get_one).delete(datasets::delete))
        .route("/api/datasets/{id}/rows", get(datasets::rows))
        .route("/api/projects/{id}/jobs", get(jobs::list))
        .route("/api/jobs/{id}", get(jobs::get_one).delete(jobs::delete))
        .route("/api/jobs/{id}/entries", get(jobs::entries))
        .route("/api/jobs/{id}/cancel", post(jobs::cancel))
        .route("/api/jobs/{id}/metrics", get(metrics::for_job))
        .route("/api/projects/{id}/metrics", get(metrics::for_project))
        .route("/api/evaluation-results/store", post(results::store))
        .route(
            "/api/evaluation-results/project/{id}",
            get(results::list_for_project),
        )
        .route("/api/evaluate/rows", post(evaluate::run_rows))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Resolve the directory holding the compiled dashboard bundle.
fn site_dir() -> PathBuf {
    std::env::var("SITE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../client/dist"))
}

/// Full application router: API routes plus the static SPA fallback.
pub fn app(state: AppState) -> Router {
    let spa = ServeDir::new(site_dir()).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
