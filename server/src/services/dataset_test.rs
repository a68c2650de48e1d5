use super::*;

// =============================================================
// CSV parsing
// =============================================================

#[test]
fn parses_plain_rows_with_header() {
    let rows = parse_csv_rows("question,expected_answer\nWhat is 2+2?,4\nCapital of France?,Paris\n")
        .expect("parse");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].question, "What is 2+2?");
    assert_eq!(rows[1].expected_answer, "Paris");
}

#[test]
fn parses_rows_without_header() {
    let rows = parse_csv_rows("What is 2+2?,4").expect("parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].expected_answer, "4");
}

#[test]
fn quoted_field_keeps_embedded_comma() {
    let rows = parse_csv_rows("\"List red, green, blue\",three colors").expect("parse");
    assert_eq!(rows[0].question, "List red, green, blue");
    assert_eq!(rows[0].expected_answer, "three colors");
}

#[test]
fn doubled_quote_unescapes() {
    let rows = parse_csv_rows("\"say \"\"hi\"\"\",greeting").expect("parse");
    assert_eq!(rows[0].question, "say \"hi\"");
}

#[test]
fn blank_lines_are_skipped() {
    let rows = parse_csv_rows("question,expected_answer\n\nq1,a1\n\n").expect("parse");
    assert_eq!(rows.len(), 1);
}

#[test]
fn header_variants_are_recognized() {
    let rows = parse_csv_rows("Question,Expected Answer\nq1,a1").expect("parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question, "q1");
}

#[test]
fn single_column_record_is_rejected() {
    let err = parse_csv_rows("question,expected_answer\nonly-one-field").expect_err("invalid");
    assert!(matches!(err, DatasetError::InvalidCsv { line: 2, .. }));
}

#[test]
fn header_only_input_is_empty() {
    let err = parse_csv_rows("question,expected_answer\n").expect_err("empty");
    assert!(matches!(err, DatasetError::Empty));
}

// =============================================================
// Storage (live database)
// =============================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    async fn live_pool() -> sqlx::PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for live tests");
        PgPoolOptions::new().connect(&url).await.expect("connect")
    }

    async fn seed_project(pool: &sqlx::PgPool) -> uuid::Uuid {
        let owner = crate::services::auth::register(
            pool,
            &format!("dataset-test-{}@example.com", uuid::Uuid::new_v4()),
            "password123",
            "Dataset Test",
        )
        .await
        .expect("register")
        .id;
        crate::services::project::create(
            pool,
            owner,
            &shared::CreateProject { name: "ds".to_owned(), description: String::new() },
        )
        .await
        .expect("project")
        .id
    }

    #[tokio::test]
    async fn create_stores_rows_in_order() {
        let pool = live_pool().await;
        let project_id = seed_project(&pool).await;

        let input = vec![
            DatasetRow { question: "q1".to_owned(), expected_answer: "a1".to_owned() },
            DatasetRow { question: "q2".to_owned(), expected_answer: "a2".to_owned() },
        ];
        let dataset = create(&pool, project_id, "golden", &input).await.expect("create");
        assert_eq!(dataset.row_count, 2);

        let stored = rows(&pool, dataset.id, None).await.expect("rows");
        assert_eq!(stored, input);

        let preview = rows(&pool, dataset.id, Some(1)).await.expect("preview");
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].question, "q1");
    }

    #[tokio::test]
    async fn delete_removes_dataset_and_rows() {
        let pool = live_pool().await;
        let project_id = seed_project(&pool).await;

        let dataset = create(
            &pool,
            project_id,
            "doomed",
            &[DatasetRow { question: "q".to_owned(), expected_answer: "a".to_owned() }],
        )
        .await
        .expect("create");

        delete(&pool, dataset.id).await.expect("delete");
        let err = get(&pool, dataset.id).await.expect_err("gone");
        assert!(matches!(err, DatasetError::NotFound(_)));
    }
}
