//! Shared wire model for the evalboard client/server boundary.
//!
//! This crate owns the entity DTOs and the NDJSON evaluation-stream protocol
//! used by `server`, `client`, and `cli`. Payloads stay plain serde structs so
//! every consumer round-trips the same JSON the REST API speaks.

pub mod csv;
pub mod stream;

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use stream::{EvalEvent, LineSplitter, StreamError};

// =============================================================================
// AUTH
// =============================================================================

/// An authenticated user as returned by `/api/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, unique per account.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Response to a successful login or registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: User,
    /// Seconds until the session expires.
    pub expires_in: i64,
}

/// `POST /api/auth/login` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

// =============================================================================
// PROJECTS
// =============================================================================

/// A project grouping prompts, datasets, and evaluation jobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Owning user.
    pub owner_id: Uuid,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last-update timestamp in milliseconds since the Unix epoch.
    pub updated_at: i64,
}

/// `POST /api/projects` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// `PUT /api/projects/:id` payload. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// PROMPTS
// =============================================================================

/// A named prompt within a project. Template text lives on versions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique prompt identifier.
    pub id: Uuid,
    /// Project this prompt belongs to.
    pub project_id: Uuid,
    /// Display name.
    pub name: String,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last-update timestamp in milliseconds since the Unix epoch.
    pub updated_at: i64,
}

/// Lifecycle status of a prompt version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Editable, not yet used for runs by default.
    #[default]
    Draft,
    /// Active version offered for new evaluation runs.
    Published,
    /// Retired; kept for history and metric comparisons.
    Archived,
}

impl VersionStatus {
    /// Stable string form used in the database and on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// An immutable snapshot of prompt template text.
///
/// Version numbers increase monotonically per prompt; the text of an existing
/// version never changes, only its status does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVersion {
    /// Unique version identifier.
    pub id: Uuid,
    /// Prompt this version belongs to.
    pub prompt_id: Uuid,
    /// Monotonically increasing version number within the prompt.
    pub version: i32,
    /// System prompt text sent to both models.
    pub system_prompt: String,
    /// User template; `{Question}` is replaced with the dataset question.
    pub user_prompt_template: String,
    /// Lifecycle status.
    pub status: VersionStatus,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// `POST /api/prompts` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePrompt {
    pub project_id: Uuid,
    pub name: String,
}

/// `POST /api/prompts/:id/versions` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePromptVersion {
    pub system_prompt: String,
    pub user_prompt_template: String,
}

// =============================================================================
// DATASETS
// =============================================================================

/// One dataset row: a question paired with its expected answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub question: String,
    pub expected_answer: String,
}

/// Dataset metadata. Rows are fetched separately.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique dataset identifier.
    pub id: Uuid,
    /// Project this dataset belongs to.
    pub project_id: Uuid,
    /// Display name, usually the uploaded file name.
    pub name: String,
    /// Number of rows stored.
    pub row_count: i64,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
}

// =============================================================================
// JOBS AND ENTRIES
// =============================================================================

/// Lifecycle status of an evaluation job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Stable string form used in the database and on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// True for statuses no further progress can follow.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// One evaluation run comparing two model configurations over a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationJob {
    /// Unique job identifier.
    pub id: Uuid,
    /// Project this job belongs to.
    pub project_id: Uuid,
    /// Prompt version the run used, if recorded.
    pub prompt_version: Option<String>,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Completion percentage, 0-100, monotonically non-decreasing.
    pub progress: i32,
    /// Total dataset rows in the run.
    pub total_entries: i32,
    /// Rows evaluated successfully.
    pub completed_entries: i32,
    /// Rows that errored during evaluation.
    pub failed_entries: i32,
    /// Model identifier for side A.
    pub model_a: String,
    /// Model identifier for side B.
    pub model_b: String,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// When the run started, if it has.
    pub started_at: Option<i64>,
    /// When the run reached a terminal status, if it has.
    pub completed_at: Option<i64>,
}

/// Per-row evaluation result carried inside `row_complete` events and stored
/// as job entries. Field names match the original wire format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    pub question: String,
    pub expected_answer: String,
    pub model_a_response: String,
    pub model_a_latency: f64,
    pub model_a_tokens: i64,
    pub model_a_cost: f64,
    pub model_a_accuracy: f64,
    pub model_b_response: String,
    pub model_b_latency: f64,
    pub model_b_tokens: i64,
    pub model_b_cost: f64,
    pub model_b_accuracy: f64,
    /// Model identifier of the higher-accuracy side; side A wins ties.
    pub winner: String,
}

/// A stored dataset row's evaluation outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Job this entry belongs to.
    pub job_id: Uuid,
    /// 1-based row number within the dataset.
    pub row_number: i32,
    /// Whether evaluation of this row failed.
    pub failed: bool,
    /// Error message when `failed` is set.
    pub error: Option<String>,
    /// The paired model outputs and derived metrics.
    #[serde(flatten)]
    pub result: RowResult,
}

// =============================================================================
// EVALUATION REQUESTS AND RESULTS
// =============================================================================

/// `POST /api/evaluate/rows` payload — one streamed evaluation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvalRequest {
    pub system_prompt: String,
    pub user_prompt_template: String,
    pub rows: Vec<DatasetRow>,
    pub model_a: String,
    pub model_b: String,
    pub openai_key: String,
    pub deepseek_key: String,
    #[serde(default)]
    pub anthropic_key: String,
}

/// `POST /api/evaluation-results/store` payload — persist a finished run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreResultsRequest {
    pub project_id: Uuid,
    /// Prompt version label the run used, e.g. `"1.2"`.
    pub prompt_version: Option<String>,
    pub name: String,
    pub model_a: String,
    pub model_b: String,
    pub rows: Vec<RowResult>,
}

/// Aggregated metrics for one job.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetrics {
    pub job_id: Uuid,
    pub row_count: i64,
    pub avg_accuracy_a: f64,
    pub avg_accuracy_b: f64,
    pub total_tokens: i64,
    pub total_cost: f64,
    pub wins_a: i64,
    pub wins_b: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// A page of list results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page; at most `limit` of them.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: i64,
    /// 1-based page number served.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total: 0, page: 1, limit: DEFAULT_PAGE_LIMIT }
    }
}

/// Default page size when `limit` is absent.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Upper bound on requested page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Clamp raw `page`/`limit` query values into the supported range.
///
/// Page numbers are 1-based; zero and absent values fall back to the first
/// page and the default limit.
#[must_use]
pub fn clamp_page(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}
