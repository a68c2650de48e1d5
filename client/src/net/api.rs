//! REST API helpers for communicating with the server.
//!
//! In the browser (`csr`): real HTTP calls via `gloo-net` carrying the bearer
//! token. Native builds (tests): stubs returning errors since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, String>` with a display-ready message, so
//! pages can park failures in their state slice without mapping error types.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use uuid::Uuid;

use shared::{
    AuthResponse, CreateProject, CreatePrompt, CreatePromptVersion, Dataset, DatasetRow,
    EvaluationEntry, EvaluationJob, JobMetrics, LoginRequest, Paginated, Project, Prompt,
    PromptVersion, RegisterRequest, StoreResultsRequest, UpdateProject, VersionStatus,
};

// =============================================================================
// ENDPOINT BUILDERS
// =============================================================================

#[must_use]
pub fn projects_endpoint(page: u32, limit: u32) -> String {
    format!("/api/projects?page={page}&limit={limit}")
}

#[must_use]
pub fn project_endpoint(id: Uuid) -> String {
    format!("/api/projects/{id}")
}

#[must_use]
pub fn project_prompts_endpoint(project_id: Uuid) -> String {
    format!("/api/projects/{project_id}/prompts")
}

#[must_use]
pub fn prompt_versions_endpoint(prompt_id: Uuid) -> String {
    format!("/api/prompts/{prompt_id}/versions")
}

#[must_use]
pub fn version_status_endpoint(version_id: Uuid) -> String {
    format!("/api/prompt-versions/{version_id}/status")
}

#[must_use]
pub fn project_datasets_endpoint(project_id: Uuid) -> String {
    format!("/api/projects/{project_id}/datasets")
}

#[must_use]
pub fn dataset_rows_endpoint(dataset_id: Uuid, limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("/api/datasets/{dataset_id}/rows?limit={limit}"),
        None => format!("/api/datasets/{dataset_id}/rows"),
    }
}

#[must_use]
pub fn project_jobs_endpoint(project_id: Uuid, page: u32, limit: u32) -> String {
    format!("/api/projects/{project_id}/jobs?page={page}&limit={limit}")
}

#[must_use]
pub fn job_endpoint(id: Uuid) -> String {
    format!("/api/jobs/{id}")
}

#[must_use]
pub fn job_entries_endpoint(id: Uuid) -> String {
    format!("/api/jobs/{id}/entries")
}

#[must_use]
pub fn job_metrics_endpoint(id: Uuid) -> String {
    format!("/api/jobs/{id}/metrics")
}

#[must_use]
pub fn project_metrics_endpoint(project_id: Uuid) -> String {
    format!("/api/projects/{project_id}/metrics")
}

pub const EVALUATE_ROWS_ENDPOINT: &str = "/api/evaluate/rows";
pub const STORE_RESULTS_ENDPOINT: &str = "/api/evaluation-results/store";

#[must_use]
pub fn request_failed_message(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("request failed: {status}")
    } else {
        format!("request failed: {status}: {body}")
    }
}

// =============================================================================
// HTTP PLUMBING (browser only)
// =============================================================================

#[cfg(feature = "csr")]
async fn check_status(resp: gloo_net::http::Response) -> Result<gloo_net::http::Response, String> {
    if resp.ok() {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(request_failed_message(resp.status(), &body))
    }
}

#[cfg(feature = "csr")]
async fn get_json<T: serde::de::DeserializeOwned>(token: &str, url: &str) -> Result<T, String> {
    let resp = gloo_net::http::Request::get(url)
        .header("Authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check_status(resp).await?.json().await.map_err(|e| e.to_string())
}

#[cfg(feature = "csr")]
async fn send_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
    method: &str,
    token: &str,
    url: &str,
    body: &B,
) -> Result<T, String> {
    let builder = match method {
        "PUT" => gloo_net::http::Request::put(url),
        _ => gloo_net::http::Request::post(url),
    };
    let resp = builder
        .header("Authorization", &format!("Bearer {token}"))
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check_status(resp).await?.json().await.map_err(|e| e.to_string())
}

#[cfg(feature = "csr")]
async fn delete_resource(token: &str, url: &str) -> Result<(), String> {
    let resp = gloo_net::http::Request::delete(url)
        .header("Authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check_status(resp).await.map(|_| ())
}

#[cfg(not(feature = "csr"))]
macro_rules! server_stub {
    ($($arg:expr),* $(,)?) => {{
        $(let _ = $arg;)*
        Err("not available on server".to_owned())
    }};
}

// =============================================================================
// AUTH
// =============================================================================

/// `POST /api/auth/login`
pub async fn login(payload: &LoginRequest) -> Result<AuthResponse, String> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        check_status(resp).await?.json().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(payload)
}

/// `POST /api/auth/register`
pub async fn register(payload: &RegisterRequest) -> Result<AuthResponse, String> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/register")
            .json(payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        check_status(resp).await?.json().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(payload)
}

/// `GET /api/auth/me` — revalidate a stored token. `None` means signed out.
pub async fn fetch_current_user(token: &str) -> Option<shared::User> {
    #[cfg(feature = "csr")]
    {
        #[derive(serde::Deserialize)]
        struct Me {
            id: Uuid,
            email: String,
            name: String,
        }
        let me: Me = get_json(token, "/api/auth/me").await.ok()?;
        Some(shared::User { id: me.id, email: me.email, name: me.name, created_at: 0 })
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
        None
    }
}

/// `POST /api/auth/logout`
pub async fn logout(token: &str) {
    #[cfg(feature = "csr")]
    {
        let _ = gloo_net::http::Request::post("/api/auth/logout")
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await;
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
    }
}

// =============================================================================
// PROJECTS
// =============================================================================

pub async fn list_projects(token: &str, page: u32, limit: u32) -> Result<Paginated<Project>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &projects_endpoint(page, limit)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, page, limit)
}

pub async fn create_project(token: &str, payload: &CreateProject) -> Result<Project, String> {
    #[cfg(feature = "csr")]
    {
        send_json("POST", token, "/api/projects", payload).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, payload)
}

pub async fn update_project(token: &str, id: Uuid, payload: &UpdateProject) -> Result<Project, String> {
    #[cfg(feature = "csr")]
    {
        send_json("PUT", token, &project_endpoint(id), payload).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, id, payload)
}

pub async fn delete_project(token: &str, id: Uuid) -> Result<(), String> {
    #[cfg(feature = "csr")]
    {
        delete_resource(token, &project_endpoint(id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, id)
}

// =============================================================================
// PROMPTS AND VERSIONS
// =============================================================================

pub async fn list_prompts(token: &str, project_id: Uuid) -> Result<Vec<Prompt>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &project_prompts_endpoint(project_id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, project_id)
}

pub async fn create_prompt(
    token: &str,
    project_id: Uuid,
    payload: &CreatePrompt,
) -> Result<Prompt, String> {
    #[cfg(feature = "csr")]
    {
        send_json("POST", token, &project_prompts_endpoint(project_id), payload).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, project_id, payload)
}

pub async fn list_prompt_versions(token: &str, prompt_id: Uuid) -> Result<Vec<PromptVersion>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &prompt_versions_endpoint(prompt_id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, prompt_id)
}

pub async fn create_prompt_version(
    token: &str,
    prompt_id: Uuid,
    payload: &CreatePromptVersion,
) -> Result<PromptVersion, String> {
    #[cfg(feature = "csr")]
    {
        send_json("POST", token, &prompt_versions_endpoint(prompt_id), payload).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, prompt_id, payload)
}

pub async fn set_version_status(
    token: &str,
    version_id: Uuid,
    status: VersionStatus,
) -> Result<PromptVersion, String> {
    #[cfg(feature = "csr")]
    {
        let body = serde_json::json!({ "status": status });
        send_json("PUT", token, &version_status_endpoint(version_id), &body).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, version_id, status)
}

// =============================================================================
// DATASETS
// =============================================================================

pub async fn list_datasets(token: &str, project_id: Uuid) -> Result<Vec<Dataset>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &project_datasets_endpoint(project_id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, project_id)
}

/// Upload raw CSV text as a named dataset.
pub async fn upload_dataset_csv(
    token: &str,
    project_id: Uuid,
    name: &str,
    csv: &str,
) -> Result<Dataset, String> {
    #[cfg(feature = "csr")]
    {
        let body = serde_json::json!({ "name": name, "csv": csv });
        send_json("POST", token, &project_datasets_endpoint(project_id), &body).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, project_id, name, csv)
}

pub async fn fetch_dataset_rows(
    token: &str,
    dataset_id: Uuid,
    limit: Option<u32>,
) -> Result<Vec<DatasetRow>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &dataset_rows_endpoint(dataset_id, limit)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, dataset_id, limit)
}

pub async fn delete_dataset(token: &str, id: Uuid) -> Result<(), String> {
    #[cfg(feature = "csr")]
    {
        delete_resource(token, &format!("/api/datasets/{id}")).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, id)
}

// =============================================================================
// JOBS, RESULTS, METRICS
// =============================================================================

pub async fn list_jobs(
    token: &str,
    project_id: Uuid,
    page: u32,
    limit: u32,
) -> Result<Paginated<EvaluationJob>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &project_jobs_endpoint(project_id, page, limit)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, project_id, page, limit)
}

pub async fn fetch_job_entries(token: &str, job_id: Uuid) -> Result<Vec<EvaluationEntry>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &job_entries_endpoint(job_id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, job_id)
}

pub async fn delete_job(token: &str, id: Uuid) -> Result<(), String> {
    #[cfg(feature = "csr")]
    {
        delete_resource(token, &job_endpoint(id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, id)
}

/// Persist a finished streamed run as a completed job.
pub async fn store_results(token: &str, payload: &StoreResultsRequest) -> Result<EvaluationJob, String> {
    #[cfg(feature = "csr")]
    {
        send_json("POST", token, STORE_RESULTS_ENDPOINT, payload).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, payload)
}

pub async fn fetch_job_metrics(token: &str, job_id: Uuid) -> Result<JobMetrics, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &job_metrics_endpoint(job_id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, job_id)
}

pub async fn fetch_project_metrics(token: &str, project_id: Uuid) -> Result<Vec<JobMetrics>, String> {
    #[cfg(feature = "csr")]
    {
        get_json(token, &project_metrics_endpoint(project_id)).await
    }
    #[cfg(not(feature = "csr"))]
    server_stub!(token, project_id)
}
