//! Dataset service — upload, listing, preview, and row storage.
//!
//! DESIGN
//! ======
//! Uploads arrive either as a JSON array of `{question, expected_answer}`
//! objects or as CSV with a `question,expected_answer` header. Rows are
//! stored individually so previews and streamed runs can read slices.

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;

use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared::{Dataset, DatasetRow};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    NotFound(Uuid),
    #[error("dataset is empty")]
    Empty,
    #[error("invalid CSV on line {line}: {reason}")]
    InvalidCsv { line: usize, reason: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const DATASET_COLUMNS: &str = "d.id, d.project_id, d.name,
    (SELECT COUNT(*) FROM dataset_rows r WHERE r.dataset_id = d.id) AS row_count,
    (EXTRACT(EPOCH FROM d.created_at) * 1000)::BIGINT AS created_at";

fn row_to_dataset(row: &sqlx::postgres::PgRow) -> Dataset {
    Dataset {
        id: row.get("id"),
        project_id: row.get("project_id"),
        name: row.get("name"),
        row_count: row.get("row_count"),
        created_at: row.get("created_at"),
    }
}

// =============================================================================
// CSV PARSING
// =============================================================================

impl From<shared::csv::CsvError> for DatasetError {
    fn from(err: shared::csv::CsvError) -> Self {
        match err {
            shared::csv::CsvError::InvalidRecord { line, reason } => {
                Self::InvalidCsv { line, reason }
            }
            shared::csv::CsvError::Empty => Self::Empty,
        }
    }
}

/// Parse uploaded CSV text into dataset rows.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidCsv`] for records without two fields and
/// [`DatasetError::Empty`] when no data rows remain.
pub fn parse_csv_rows(text: &str) -> Result<Vec<DatasetRow>, DatasetError> {
    Ok(shared::csv::parse_rows(text)?)
}

// =============================================================================
// STORAGE
// =============================================================================

/// Store an uploaded dataset and its rows in one transaction.
pub async fn create(
    pool: &PgPool,
    project_id: Uuid,
    name: &str,
    rows: &[DatasetRow],
) -> Result<Dataset, DatasetError> {
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    let id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO datasets (id, project_id, name) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(project_id)
        .bind(name)
        .execute(&mut *tx)
        .await?;

    for (idx, row) in rows.iter().enumerate() {
        sqlx::query(
            "INSERT INTO dataset_rows (dataset_id, row_number, question, expected_answer)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(i32::try_from(idx + 1).unwrap_or(i32::MAX))
        .bind(&row.question)
        .bind(&row.expected_answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    get(pool, id).await
}

/// List datasets in a project, newest first.
pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Dataset>, DatasetError> {
    let rows = sqlx::query(&format!(
        "SELECT {DATASET_COLUMNS} FROM datasets d WHERE d.project_id = $1 ORDER BY d.created_at DESC"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_dataset).collect())
}

/// Fetch dataset metadata by id.
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Dataset, DatasetError> {
    let row = sqlx::query(&format!("SELECT {DATASET_COLUMNS} FROM datasets d WHERE d.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatasetError::NotFound(id))?;

    Ok(row_to_dataset(&row))
}

/// Fetch the first `limit` rows of a dataset in row order. `None` fetches all.
pub async fn rows(pool: &PgPool, id: Uuid, limit: Option<i64>) -> Result<Vec<DatasetRow>, DatasetError> {
    let rows = sqlx::query(
        "SELECT question, expected_answer FROM dataset_rows
         WHERE dataset_id = $1 ORDER BY row_number
         LIMIT $2",
    )
    .bind(id)
    .bind(limit.unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| DatasetRow { question: r.get("question"), expected_answer: r.get("expected_answer") })
        .collect())
}

/// Delete a dataset and its rows.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatasetError> {
    let result = sqlx::query("DELETE FROM datasets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DatasetError::NotFound(id));
    }
    Ok(())
}
