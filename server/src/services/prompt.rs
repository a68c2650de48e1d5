//! Prompt service — prompts and their immutable, monotonically numbered
//! versions.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared::{CreatePromptVersion, Prompt, PromptVersion, VersionStatus};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt not found: {0}")]
    NotFound(Uuid),
    #[error("prompt version not found: {0}")]
    VersionNotFound(Uuid),
    #[error("unknown version status: {0}")]
    UnknownStatus(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const PROMPT_COLUMNS: &str = "id, project_id, name,
    (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at,
    (EXTRACT(EPOCH FROM updated_at) * 1000)::BIGINT AS updated_at";

const VERSION_COLUMNS: &str = "id, prompt_id, version, system_prompt, user_prompt_template, status,
    (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at";

fn row_to_prompt(row: &sqlx::postgres::PgRow) -> Prompt {
    Prompt {
        id: row.get("id"),
        project_id: row.get("project_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_version(row: &sqlx::postgres::PgRow) -> Result<PromptVersion, PromptError> {
    let raw_status: String = row.get("status");
    let status = VersionStatus::parse(&raw_status).ok_or(PromptError::UnknownStatus(raw_status))?;
    Ok(PromptVersion {
        id: row.get("id"),
        prompt_id: row.get("prompt_id"),
        version: row.get("version"),
        system_prompt: row.get("system_prompt"),
        user_prompt_template: row.get("user_prompt_template"),
        status,
        created_at: row.get("created_at"),
    })
}

/// Create a prompt in a project.
pub async fn create(pool: &PgPool, project_id: Uuid, name: &str) -> Result<Prompt, PromptError> {
    let row = sqlx::query(&format!(
        "INSERT INTO prompts (id, project_id, name) VALUES ($1, $2, $3)
         RETURNING {PROMPT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row_to_prompt(&row))
}

/// List prompts in a project, newest first.
pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Prompt>, PromptError> {
    let rows = sqlx::query(&format!(
        "SELECT {PROMPT_COLUMNS} FROM prompts WHERE project_id = $1 ORDER BY created_at DESC"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_prompt).collect())
}

/// Delete a prompt and its versions.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), PromptError> {
    let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(PromptError::NotFound(id));
    }
    Ok(())
}

/// Create the next version of a prompt as a draft.
///
/// The version number is allocated inside the insert so concurrent creates
/// cannot produce duplicates (the unique index backstops the race).
pub async fn create_version(
    pool: &PgPool,
    prompt_id: Uuid,
    payload: &CreatePromptVersion,
) -> Result<PromptVersion, PromptError> {
    let row = sqlx::query(&format!(
        "INSERT INTO prompt_versions (id, prompt_id, version, system_prompt, user_prompt_template, status)
         SELECT $1, $2, COALESCE(MAX(version), 0) + 1, $3, $4, 'draft'
         FROM prompt_versions WHERE prompt_id = $2
         RETURNING {VERSION_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(prompt_id)
    .bind(&payload.system_prompt)
    .bind(&payload.user_prompt_template)
    .fetch_one(pool)
    .await?;

    row_to_version(&row)
}

/// List a prompt's versions, newest first.
pub async fn list_versions(pool: &PgPool, prompt_id: Uuid) -> Result<Vec<PromptVersion>, PromptError> {
    let rows = sqlx::query(&format!(
        "SELECT {VERSION_COLUMNS} FROM prompt_versions WHERE prompt_id = $1 ORDER BY version DESC"
    ))
    .bind(prompt_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_version).collect()
}

/// Change a version's lifecycle status. Template text is immutable.
///
/// Publishing a version archives any previously published sibling so at most
/// one version per prompt is published at a time.
pub async fn set_version_status(
    pool: &PgPool,
    version_id: Uuid,
    status: VersionStatus,
) -> Result<PromptVersion, PromptError> {
    let mut tx = pool.begin().await?;

    if status == VersionStatus::Published {
        sqlx::query(
            "UPDATE prompt_versions SET status = 'archived'
             WHERE status = 'published'
               AND prompt_id = (SELECT prompt_id FROM prompt_versions WHERE id = $1)",
        )
        .bind(version_id)
        .execute(&mut *tx)
        .await?;
    }

    let row = sqlx::query(&format!(
        "UPDATE prompt_versions SET status = $2 WHERE id = $1 RETURNING {VERSION_COLUMNS}"
    ))
    .bind(version_id)
    .bind(status.as_str())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(PromptError::VersionNotFound(version_id))?;

    tx.commit().await?;
    row_to_version(&row)
}
