use super::*;

// Storage itself is browser-only; these tests pin the key names and the
// snapshot wire shapes other deployments already wrote.

#[test]
fn key_names_are_stable() {
    assert_eq!(KEY_TOKEN, "token");
    assert_eq!(KEY_USER, "user");
    assert_eq!(KEY_PROJECTS, "projects");
    assert_eq!(KEY_JOBS, "evaluation_jobs");
    assert_eq!(KEY_EVALUATIONS, "evaluations");
    assert_eq!(KEY_API_KEYS, "llm_api_keys");
    assert_eq!(KEY_SELECTED_PROJECT, "selectedProjectId");
}

#[test]
fn api_keys_tolerate_missing_fields() {
    let keys: ApiKeys = serde_json::from_str(r#"{"openai_key":"sk-1"}"#).expect("parse");
    assert_eq!(keys.openai_key, "sk-1");
    assert!(keys.deepseek_key.is_empty());
    assert!(keys.anthropic_key.is_empty());
}

#[test]
fn api_keys_round_trip() {
    let keys = ApiKeys {
        openai_key: "sk-1".to_owned(),
        deepseek_key: "sk-2".to_owned(),
        anthropic_key: String::new(),
    };
    let raw = serde_json::to_string(&keys).expect("serialize");
    let back: ApiKeys = serde_json::from_str(&raw).expect("parse");
    assert_eq!(back, keys);
}

#[test]
fn native_storage_is_a_no_op() {
    // Without a browser, loads yield None and saves do nothing.
    save_string("some-key", "value");
    assert_eq!(load_string("some-key"), None);
    assert!(load_projects().is_none());
    assert!(load_evaluations().is_none());
    assert_eq!(load_api_keys(), ApiKeys::default());
}
