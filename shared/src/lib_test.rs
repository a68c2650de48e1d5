use super::*;

fn sample_result() -> RowResult {
    RowResult {
        question: "What is an LLM?".to_owned(),
        expected_answer: "A large language model".to_owned(),
        model_a_response: "A large language model.".to_owned(),
        model_a_latency: 2.5,
        model_a_tokens: 120,
        model_a_cost: 0.0018,
        model_a_accuracy: 1.0,
        model_b_response: "A neural network trained on text.".to_owned(),
        model_b_latency: 1.5,
        model_b_tokens: 95,
        model_b_cost: 0.000_013,
        model_b_accuracy: 0.5,
        winner: "gpt-4".to_owned(),
    }
}

// =============================================================
// Status enums
// =============================================================

#[test]
fn job_status_string_round_trip() {
    for status in [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ] {
        assert_eq!(JobStatus::parse(status.as_str()), Some(status));
    }
}

#[test]
fn job_status_rejects_unknown_value() {
    assert_eq!(JobStatus::parse("paused"), None);
}

#[test]
fn job_status_terminal_variants() {
    assert!(!JobStatus::Pending.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
    assert!(JobStatus::Cancelled.is_terminal());
}

#[test]
fn job_status_serializes_lowercase() {
    let json = serde_json::to_string(&JobStatus::Running).expect("serialize");
    assert_eq!(json, "\"running\"");
}

#[test]
fn version_status_string_round_trip() {
    for status in [VersionStatus::Draft, VersionStatus::Published, VersionStatus::Archived] {
        assert_eq!(VersionStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(VersionStatus::parse("deleted"), None);
}

// =============================================================
// Entry serialization
// =============================================================

#[test]
fn evaluation_entry_flattens_result_fields() {
    let entry = EvaluationEntry {
        id: Uuid::new_v4(),
        job_id: Uuid::new_v4(),
        row_number: 3,
        failed: false,
        error: None,
        result: sample_result(),
    };

    let value = serde_json::to_value(&entry).expect("serialize");
    assert_eq!(value["row_number"], 3);
    // Result fields sit at the top level, matching the original wire format.
    assert_eq!(value["model_a_tokens"], 120);
    assert_eq!(value["winner"], "gpt-4");
    assert!(value.get("result").is_none());

    let restored: EvaluationEntry = serde_json::from_value(value).expect("deserialize");
    assert_eq!(restored, entry);
}

// =============================================================
// Pagination
// =============================================================

#[test]
fn clamp_page_defaults() {
    assert_eq!(clamp_page(None, None), (1, DEFAULT_PAGE_LIMIT));
}

#[test]
fn clamp_page_rejects_zero_page() {
    assert_eq!(clamp_page(Some(0), Some(5)), (1, 5));
}

#[test]
fn clamp_page_caps_limit() {
    assert_eq!(clamp_page(Some(2), Some(10_000)), (2, MAX_PAGE_LIMIT));
    assert_eq!(clamp_page(Some(2), Some(0)), (2, 1));
}

#[test]
fn paginated_default_is_empty_first_page() {
    let page: Paginated<Project> = Paginated::default();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
}

// =============================================================
// Request payload defaults
// =============================================================

#[test]
fn eval_request_anthropic_key_defaults_empty() {
    let req: EvalRequest = serde_json::from_value(serde_json::json!({
        "system_prompt": "You are helpful.",
        "user_prompt_template": "Answer: {Question}",
        "rows": [{"question": "q", "expected_answer": "a"}],
        "model_a": "gpt-4",
        "model_b": "deepseek-chat",
        "openai_key": "sk-a",
        "deepseek_key": "sk-b"
    }))
    .expect("deserialize");

    assert!(req.anthropic_key.is_empty());
    assert_eq!(req.rows.len(), 1);
}
