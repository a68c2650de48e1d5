//! Metrics service — SQL aggregates over stored evaluation entries.
//!
//! Failed rows are excluded from accuracy averages and win counts but their
//! token and cost totals still count; the spend happened either way.

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;

use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared::JobMetrics;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("job not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const METRIC_AGGREGATES: &str = "
    COUNT(*) AS row_count,
    COALESCE(AVG(e.model_a_accuracy) FILTER (WHERE NOT e.failed), 0) AS avg_accuracy_a,
    COALESCE(AVG(e.model_b_accuracy) FILTER (WHERE NOT e.failed), 0) AS avg_accuracy_b,
    COALESCE(SUM(e.model_a_tokens + e.model_b_tokens), 0)::BIGINT AS total_tokens,
    COALESCE(SUM(e.model_a_cost + e.model_b_cost), 0) AS total_cost,
    COUNT(*) FILTER (WHERE NOT e.failed AND e.winner = j.model_a) AS wins_a,
    COUNT(*) FILTER (WHERE NOT e.failed AND e.winner = j.model_b) AS wins_b";

fn row_to_metrics(job_id: Uuid, row: &sqlx::postgres::PgRow) -> JobMetrics {
    JobMetrics {
        job_id,
        row_count: row.get("row_count"),
        avg_accuracy_a: row.get("avg_accuracy_a"),
        avg_accuracy_b: row.get("avg_accuracy_b"),
        total_tokens: row.get("total_tokens"),
        total_cost: row.get("total_cost"),
        wins_a: row.get("wins_a"),
        wins_b: row.get("wins_b"),
    }
}

/// Aggregate metrics for one job. A job with no entries yields zeros.
pub async fn for_job(pool: &PgPool, job_id: Uuid) -> Result<JobMetrics, MetricsError> {
    // Existence check first so an unknown job id is a 404, not all-zero
    // metrics.
    crate::services::job::get(pool, job_id)
        .await
        .map_err(|_| MetricsError::NotFound(job_id))?;

    let row = sqlx::query(&format!(
        "SELECT {METRIC_AGGREGATES}
         FROM evaluation_entries e
         JOIN evaluation_jobs j ON j.id = e.job_id
         WHERE e.job_id = $1"
    ))
    .bind(job_id)
    .fetch_one(pool)
    .await?;

    Ok(row_to_metrics(job_id, &row))
}

/// Aggregate metrics for every job in a project, one element per job.
pub async fn for_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<JobMetrics>, MetricsError> {
    let rows = sqlx::query(&format!(
        "SELECT e.job_id, {METRIC_AGGREGATES}
         FROM evaluation_entries e
         JOIN evaluation_jobs j ON j.id = e.job_id
         WHERE j.project_id = $1
         GROUP BY e.job_id
         ORDER BY MAX(j.created_at) DESC"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| row_to_metrics(row.get("job_id"), row))
        .collect())
}
