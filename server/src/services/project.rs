//! Project service — owner-scoped CRUD with pagination.

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;

use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared::{CreateProject, Paginated, Project, UpdateProject, clamp_page};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const PROJECT_COLUMNS: &str = "id, name, description, owner_id,
    (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at,
    (EXTRACT(EPOCH FROM updated_at) * 1000)::BIGINT AS updated_at";

fn row_to_project(row: &sqlx::postgres::PgRow) -> Project {
    Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Create a project owned by `owner_id`.
pub async fn create(pool: &PgPool, owner_id: Uuid, payload: &CreateProject) -> Result<Project, ProjectError> {
    let row = sqlx::query(&format!(
        "INSERT INTO projects (id, name, description, owner_id) VALUES ($1, $2, $3, $4)
         RETURNING {PROJECT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(row_to_project(&row))
}

/// List the owner's projects, newest first, paginated.
pub async fn list(
    pool: &PgPool,
    owner_id: Uuid,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<Paginated<Project>, ProjectError> {
    let (page, limit) = clamp_page(page, limit);
    let offset = i64::from(page - 1) * i64::from(limit);

    let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM projects WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_one(pool)
        .await?
        .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(owner_id)
    .bind(i64::from(limit))
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(Paginated { items: rows.iter().map(row_to_project).collect(), total, page, limit })
}

/// Fetch one project by id, scoped to its owner.
pub async fn get(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<Project, ProjectError> {
    let row = sqlx::query(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ProjectError::NotFound(id))?;

    Ok(row_to_project(&row))
}

/// Update name/description; absent fields keep their value.
pub async fn update(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    payload: &UpdateProject,
) -> Result<Project, ProjectError> {
    let row = sqlx::query(&format!(
        "UPDATE projects
         SET name = COALESCE($3, name),
             description = COALESCE($4, description),
             updated_at = now()
         WHERE id = $1 AND owner_id = $2
         RETURNING {PROJECT_COLUMNS}"
    ))
    .bind(id)
    .bind(owner_id)
    .bind(payload.name.as_deref())
    .bind(payload.description.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or(ProjectError::NotFound(id))?;

    Ok(row_to_project(&row))
}

/// Delete a project. Dependent rows cascade in the schema.
pub async fn delete(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<(), ProjectError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ProjectError::NotFound(id));
    }
    Ok(())
}
