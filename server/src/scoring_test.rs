use super::*;

// =============================================================
// word_overlap_accuracy
// =============================================================

#[test]
fn full_overlap_scores_one() {
    let acc = word_overlap_accuracy("A large language model", "a large language model");
    assert!((acc - 1.0).abs() < f64::EPSILON);
}

#[test]
fn no_overlap_scores_zero() {
    let acc = word_overlap_accuracy("completely unrelated text", "quantum chromodynamics");
    assert!(acc.abs() < f64::EPSILON);
}

#[test]
fn partial_overlap_is_fractional() {
    // Expected has 4 distinct words, response contains 2 of them.
    let acc = word_overlap_accuracy("the model answers", "the model is wrong");
    assert!((acc - 0.5).abs() < 1e-9);
}

#[test]
fn empty_expected_scores_zero() {
    assert!(word_overlap_accuracy("anything", "").abs() < f64::EPSILON);
}

#[test]
fn extra_response_words_do_not_exceed_one() {
    let acc = word_overlap_accuracy(
        "yes yes the answer is forty two exactly as expected",
        "forty two",
    );
    assert!(acc <= 1.0);
    assert!((acc - 1.0).abs() < f64::EPSILON);
}

// =============================================================
// token_cost
// =============================================================

#[test]
fn openai_cost_per_thousand() {
    let cost = token_cost("gpt-4", 1000);
    assert!((cost - 0.015).abs() < 1e-12);
}

#[test]
fn deepseek_cost_per_million() {
    let cost = token_cost("deepseek-chat", 1_000_000);
    assert!((cost - 0.14).abs() < 1e-12);
}

#[test]
fn zero_tokens_cost_nothing() {
    assert!(token_cost("gpt-4", 0).abs() < f64::EPSILON);
    assert!(token_cost("deepseek-chat", 0).abs() < f64::EPSILON);
}

// =============================================================
// pick_winner
// =============================================================

#[test]
fn higher_accuracy_wins() {
    assert_eq!(pick_winner("gpt-4", 0.4, "deepseek-chat", 0.9), "deepseek-chat");
    assert_eq!(pick_winner("gpt-4", 0.9, "deepseek-chat", 0.4), "gpt-4");
}

#[test]
fn model_a_wins_ties() {
    assert_eq!(pick_winner("gpt-4", 0.5, "deepseek-chat", 0.5), "gpt-4");
}
