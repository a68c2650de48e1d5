use super::*;

#[test]
fn paginated_endpoints_carry_both_params() {
    assert_eq!(projects_endpoint(2, 25), "/api/projects?page=2&limit=25");
    let id = Uuid::nil();
    assert_eq!(
        project_jobs_endpoint(id, 1, 10),
        format!("/api/projects/{id}/jobs?page=1&limit=10")
    );
}

#[test]
fn nested_endpoints_embed_the_parent_id() {
    let id = Uuid::new_v4();
    assert_eq!(project_prompts_endpoint(id), format!("/api/projects/{id}/prompts"));
    assert_eq!(prompt_versions_endpoint(id), format!("/api/prompts/{id}/versions"));
    assert_eq!(project_datasets_endpoint(id), format!("/api/projects/{id}/datasets"));
    assert_eq!(job_metrics_endpoint(id), format!("/api/jobs/{id}/metrics"));
}

#[test]
fn dataset_rows_endpoint_limit_is_optional() {
    let id = Uuid::nil();
    assert_eq!(dataset_rows_endpoint(id, None), format!("/api/datasets/{id}/rows"));
    assert_eq!(dataset_rows_endpoint(id, Some(5)), format!("/api/datasets/{id}/rows?limit=5"));
}

#[test]
fn failure_message_includes_body_when_present() {
    assert_eq!(request_failed_message(500, ""), "request failed: 500");
    assert_eq!(request_failed_message(404, "project not found"), "request failed: 404: project not found");
}
