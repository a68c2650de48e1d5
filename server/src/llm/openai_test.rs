use super::*;
use crate::llm::{DEEPSEEK_BASE_URL, OPENAI_BASE_URL, provider_base_url};

// =============================================================
// parse_chat_completion
// =============================================================

#[test]
fn parses_text_and_usage() {
    let body = r#"{
        "choices": [{"message": {"role": "assistant", "content": "Paris."}}],
        "usage": {"prompt_tokens": 20, "completion_tokens": 3, "total_tokens": 23}
    }"#;

    let reply = parse_chat_completion(body, 1.25).expect("parse");
    assert_eq!(reply.text, "Paris.");
    assert_eq!(reply.tokens, 23);
    assert!((reply.latency_secs - 1.25).abs() < f64::EPSILON);
}

#[test]
fn missing_usage_defaults_to_zero_tokens() {
    let body = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
    let reply = parse_chat_completion(body, 0.1).expect("parse");
    assert_eq!(reply.tokens, 0);
}

#[test]
fn null_content_becomes_empty_text() {
    let body = r#"{"choices": [{"message": {"content": null}}], "usage": {"total_tokens": 5}}"#;
    let reply = parse_chat_completion(body, 0.1).expect("parse");
    assert!(reply.text.is_empty());
    assert_eq!(reply.tokens, 5);
}

#[test]
fn empty_choices_is_a_parse_error() {
    let body = r#"{"choices": [], "usage": {"total_tokens": 5}}"#;
    let err = parse_chat_completion(body, 0.1).expect_err("should fail");
    assert!(matches!(err, LlmError::ResponseParse(_)));
}

#[test]
fn invalid_json_is_a_parse_error() {
    let err = parse_chat_completion("<html>gateway error</html>", 0.1).expect_err("should fail");
    assert!(matches!(err, LlmError::ResponseParse(_)));
}

// =============================================================
// provider routing
// =============================================================

#[test]
fn deepseek_models_route_to_deepseek_base() {
    assert_eq!(provider_base_url("deepseek-chat"), DEEPSEEK_BASE_URL);
    assert_eq!(provider_base_url("deepseek-coder"), DEEPSEEK_BASE_URL);
}

#[test]
fn other_models_route_to_openai_base() {
    assert_eq!(provider_base_url("gpt-4"), OPENAI_BASE_URL);
    assert_eq!(provider_base_url("gpt-4o-mini"), OPENAI_BASE_URL);
}

#[test]
fn build_model_client_requires_matching_key() {
    let err = crate::llm::build_model_client("gpt-4", "", "sk-deepseek")
        .err()
        .expect("no key");
    assert!(matches!(err, LlmError::MissingApiKey { .. }));

    let err = crate::llm::build_model_client("deepseek-chat", "sk-openai", " ")
        .err()
        .expect("no key");
    assert!(matches!(err, LlmError::MissingApiKey { .. }));

    assert!(crate::llm::build_model_client("gpt-4", "sk-openai", "").is_ok());
}
