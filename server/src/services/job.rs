//! Job service — evaluation run records and their per-row entries.
//!
//! DESIGN
//! ======
//! Runs are streamed to the browser first and persisted afterwards: the
//! client posts the full set of row results in one request, and this
//! service writes the job plus its entries in a single transaction so a
//! half-stored run never appears in listings. Rows are keyed by
//! `(job_id, row_number)`, so retrying the store for a row overwrites
//! rather than duplicates.

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;

use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared::{
    EvaluationEntry, EvaluationJob, JobStatus, Paginated, RowResult, StoreResultsRequest,
    clamp_page,
};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job not found: {0}")]
    NotFound(Uuid),
    #[error("job already finished: {0}")]
    AlreadyTerminal(Uuid),
    #[error("unknown job status: {0}")]
    UnknownStatus(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const JOB_COLUMNS: &str = "id, project_id, prompt_version, name, status, progress,
    total_entries, completed_entries, failed_entries, model_a, model_b,
    (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at,
    (EXTRACT(EPOCH FROM started_at) * 1000)::BIGINT AS started_at,
    (EXTRACT(EPOCH FROM completed_at) * 1000)::BIGINT AS completed_at";

const ENTRY_COLUMNS: &str = "id, job_id, row_number, failed, error, question, expected_answer,
    model_a_response, model_a_latency, model_a_tokens, model_a_cost, model_a_accuracy,
    model_b_response, model_b_latency, model_b_tokens, model_b_cost, model_b_accuracy,
    winner";

fn row_to_job(row: &sqlx::postgres::PgRow) -> Result<EvaluationJob, JobError> {
    let raw_status: String = row.get("status");
    let status = JobStatus::parse(&raw_status).ok_or(JobError::UnknownStatus(raw_status))?;
    Ok(EvaluationJob {
        id: row.get("id"),
        project_id: row.get("project_id"),
        prompt_version: row.get("prompt_version"),
        name: row.get("name"),
        status,
        progress: row.get("progress"),
        total_entries: row.get("total_entries"),
        completed_entries: row.get("completed_entries"),
        failed_entries: row.get("failed_entries"),
        model_a: row.get("model_a"),
        model_b: row.get("model_b"),
        created_at: row.get("created_at"),
        started_at: row.get("started_at"),
        completed_at: row.get("completed_at"),
    })
}

fn row_to_entry(row: &sqlx::postgres::PgRow) -> EvaluationEntry {
    EvaluationEntry {
        id: row.get("id"),
        job_id: row.get("job_id"),
        row_number: row.get("row_number"),
        failed: row.get("failed"),
        error: row.get("error"),
        result: RowResult {
            question: row.get("question"),
            expected_answer: row.get("expected_answer"),
            model_a_response: row.get("model_a_response"),
            model_a_latency: row.get("model_a_latency"),
            model_a_tokens: row.get("model_a_tokens"),
            model_a_cost: row.get("model_a_cost"),
            model_a_accuracy: row.get("model_a_accuracy"),
            model_b_response: row.get("model_b_response"),
            model_b_latency: row.get("model_b_latency"),
            model_b_tokens: row.get("model_b_tokens"),
            model_b_cost: row.get("model_b_cost"),
            model_b_accuracy: row.get("model_b_accuracy"),
            winner: row.get("winner"),
        },
    }
}

/// Persist a finished run: the job record plus one entry per row, in one
/// transaction. The job lands directly in `completed` status.
pub async fn store_results(
    pool: &PgPool,
    payload: &StoreResultsRequest,
) -> Result<EvaluationJob, JobError> {
    let id = Uuid::new_v4();
    let total = i32::try_from(payload.rows.len()).unwrap_or(i32::MAX);
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO evaluation_jobs
             (id, project_id, prompt_version, name, status, progress,
              total_entries, completed_entries, failed_entries, model_a, model_b,
              started_at, completed_at)
         VALUES ($1, $2, $3, $4, 'completed', 100, $5, $5, 0, $6, $7, now(), now())",
    )
    .bind(id)
    .bind(payload.project_id)
    .bind(payload.prompt_version.as_deref())
    .bind(&payload.name)
    .bind(total)
    .bind(&payload.model_a)
    .bind(&payload.model_b)
    .execute(&mut *tx)
    .await?;

    for (idx, row) in payload.rows.iter().enumerate() {
        insert_entry(&mut tx, id, i32::try_from(idx + 1).unwrap_or(i32::MAX), false, None, row)
            .await?;
    }

    tx.commit().await?;
    get(pool, id).await
}

async fn insert_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    job_id: Uuid,
    row_number: i32,
    failed: bool,
    error: Option<&str>,
    result: &RowResult,
) -> Result<(), JobError> {
    sqlx::query(
        "INSERT INTO evaluation_entries
             (job_id, row_number, failed, error, question, expected_answer,
              model_a_response, model_a_latency, model_a_tokens, model_a_cost, model_a_accuracy,
              model_b_response, model_b_latency, model_b_tokens, model_b_cost, model_b_accuracy,
              winner)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
         ON CONFLICT (job_id, row_number) DO UPDATE SET
             failed = EXCLUDED.failed,
             error = EXCLUDED.error,
             model_a_response = EXCLUDED.model_a_response,
             model_a_latency = EXCLUDED.model_a_latency,
             model_a_tokens = EXCLUDED.model_a_tokens,
             model_a_cost = EXCLUDED.model_a_cost,
             model_a_accuracy = EXCLUDED.model_a_accuracy,
             model_b_response = EXCLUDED.model_b_response,
             model_b_latency = EXCLUDED.model_b_latency,
             model_b_tokens = EXCLUDED.model_b_tokens,
             model_b_cost = EXCLUDED.model_b_cost,
             model_b_accuracy = EXCLUDED.model_b_accuracy,
             winner = EXCLUDED.winner",
    )
    .bind(job_id)
    .bind(row_number)
    .bind(failed)
    .bind(error)
    .bind(&result.question)
    .bind(&result.expected_answer)
    .bind(&result.model_a_response)
    .bind(result.model_a_latency)
    .bind(result.model_a_tokens)
    .bind(result.model_a_cost)
    .bind(result.model_a_accuracy)
    .bind(&result.model_b_response)
    .bind(result.model_b_latency)
    .bind(result.model_b_tokens)
    .bind(result.model_b_cost)
    .bind(result.model_b_accuracy)
    .bind(&result.winner)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// List a project's jobs, newest first, paginated.
pub async fn list_by_project(
    pool: &PgPool,
    project_id: Uuid,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<Paginated<EvaluationJob>, JobError> {
    let (page, limit) = clamp_page(page, limit);
    let offset = i64::from(page - 1) * i64::from(limit);

    let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM evaluation_jobs WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(pool)
        .await?
        .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {JOB_COLUMNS} FROM evaluation_jobs WHERE project_id = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(project_id)
    .bind(i64::from(limit))
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let items = rows.iter().map(row_to_job).collect::<Result<Vec<_>, _>>()?;
    Ok(Paginated { items, total, page, limit })
}

/// Fetch one job by id.
pub async fn get(pool: &PgPool, id: Uuid) -> Result<EvaluationJob, JobError> {
    let row = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM evaluation_jobs WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(JobError::NotFound(id))?;

    row_to_job(&row)
}

/// List a job's entries in row order.
pub async fn entries(pool: &PgPool, job_id: Uuid) -> Result<Vec<EvaluationEntry>, JobError> {
    // Existence check first so an unknown job id is a 404, not an empty list.
    get(pool, job_id).await?;

    let rows = sqlx::query(&format!(
        "SELECT {ENTRY_COLUMNS} FROM evaluation_entries WHERE job_id = $1 ORDER BY row_number"
    ))
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_entry).collect())
}

/// Mark a non-terminal job cancelled.
pub async fn cancel(pool: &PgPool, id: Uuid) -> Result<EvaluationJob, JobError> {
    let existing = get(pool, id).await?;
    if existing.status.is_terminal() {
        return Err(JobError::AlreadyTerminal(id));
    }

    let row = sqlx::query(&format!(
        "UPDATE evaluation_jobs SET status = 'cancelled', completed_at = now()
         WHERE id = $1 RETURNING {JOB_COLUMNS}"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;

    row_to_job(&row)
}

/// Delete a job and its entries.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), JobError> {
    let result = sqlx::query("DELETE FROM evaluation_jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(JobError::NotFound(id));
    }
    Ok(())
}
