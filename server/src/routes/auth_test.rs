use super::*;

#[test]
fn bearer_token_extracts_value() {
    assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
}

#[test]
fn bearer_token_trims_whitespace() {
    assert_eq!(bearer_token("Bearer   abc123  "), Some("abc123"));
}

#[test]
fn bearer_token_rejects_other_schemes() {
    assert_eq!(bearer_token("Basic abc123"), None);
    assert_eq!(bearer_token("bearer abc123"), None);
}

#[test]
fn bearer_token_rejects_empty() {
    assert_eq!(bearer_token("Bearer "), None);
    assert_eq!(bearer_token(""), None);
}
