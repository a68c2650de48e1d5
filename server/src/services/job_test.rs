#![cfg(feature = "live-db-tests")]

use super::*;
use sqlx::postgres::PgPoolOptions;

async fn live_pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for live tests");
    PgPoolOptions::new().connect(&url).await.expect("connect")
}

async fn seed_project(pool: &sqlx::PgPool) -> uuid::Uuid {
    let owner = crate::services::auth::register(
        pool,
        &format!("job-test-{}@example.com", uuid::Uuid::new_v4()),
        "password123",
        "Job Test",
    )
    .await
    .expect("register")
    .id;
    crate::services::project::create(
        pool,
        owner,
        &shared::CreateProject { name: "jobs".to_owned(), description: String::new() },
    )
    .await
    .expect("project")
    .id
}

fn sample_row(question: &str) -> RowResult {
    RowResult {
        question: question.to_owned(),
        expected_answer: "4".to_owned(),
        model_a_response: "4".to_owned(),
        model_a_latency: 0.5,
        model_a_tokens: 12,
        model_a_cost: 0.00018,
        model_a_accuracy: 1.0,
        model_b_response: "four".to_owned(),
        model_b_latency: 0.8,
        model_b_tokens: 10,
        model_b_cost: 0.0000014,
        model_b_accuracy: 0.0,
        winner: "gpt-4o-mini".to_owned(),
    }
}

fn store_payload(project_id: uuid::Uuid, rows: Vec<RowResult>) -> StoreResultsRequest {
    StoreResultsRequest {
        project_id,
        prompt_version: Some("1.2".to_owned()),
        name: "math run".to_owned(),
        model_a: "gpt-4o-mini".to_owned(),
        model_b: "deepseek-chat".to_owned(),
        rows,
    }
}

#[tokio::test]
async fn store_results_creates_completed_job_with_entries() {
    let pool = live_pool().await;
    let project_id = seed_project(&pool).await;

    let job = store_results(
        &pool,
        &store_payload(project_id, vec![sample_row("q1"), sample_row("q2")]),
    )
    .await
    .expect("store");

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.total_entries, 2);
    assert_eq!(job.completed_entries, 2);
    assert_eq!(job.failed_entries, 0);
    assert!(job.completed_at.is_some());

    let stored = entries(&pool, job.id).await.expect("entries");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].row_number, 1);
    assert_eq!(stored[0].result.question, "q1");
    assert!(!stored[0].failed);
    assert_eq!(stored[1].result.question, "q2");
}

#[tokio::test]
async fn stored_job_shows_up_in_project_listing() {
    let pool = live_pool().await;
    let project_id = seed_project(&pool).await;

    let job = store_results(&pool, &store_payload(project_id, vec![sample_row("q")]))
        .await
        .expect("store");

    let page = list_by_project(&pool, project_id, None, None).await.expect("list");
    assert!(page.items.iter().any(|j| j.id == job.id));
}

#[tokio::test]
async fn cancel_rejects_terminal_jobs() {
    let pool = live_pool().await;
    let project_id = seed_project(&pool).await;

    let job = store_results(&pool, &store_payload(project_id, vec![sample_row("q")]))
        .await
        .expect("store");

    let err = cancel(&pool, job.id).await.expect_err("already completed");
    assert!(matches!(err, JobError::AlreadyTerminal(_)));
}

#[tokio::test]
async fn delete_removes_job_and_entries() {
    let pool = live_pool().await;
    let project_id = seed_project(&pool).await;

    let job = store_results(&pool, &store_payload(project_id, vec![sample_row("q")]))
        .await
        .expect("store");

    delete(&pool, job.id).await.expect("delete");

    let err = get(&pool, job.id).await.expect_err("gone");
    assert!(matches!(err, JobError::NotFound(_)));
    let err = entries(&pool, job.id).await.expect_err("entries gone");
    assert!(matches!(err, JobError::NotFound(_)));
}
