//! Row scoring: word-overlap accuracy, token cost, and winner selection.
//!
//! DESIGN
//! ======
//! Accuracy is the fraction of expected-answer words that appear in the model
//! response, case-insensitive, capped at 1.0. It is deliberately crude — the
//! dashboard compares two configurations under the same metric, so relative
//! ordering matters more than absolute calibration.

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;

use std::collections::HashSet;

/// USD per 1K tokens for OpenAI models.
const OPENAI_COST_PER_1K_TOKENS: f64 = 0.015;
/// USD per 1M tokens for DeepSeek models.
const DEEPSEEK_COST_PER_1M_TOKENS: f64 = 0.14;

/// Fraction of expected-answer words present in the response, in `0.0..=1.0`.
///
/// An empty expected answer scores 0.0.
#[must_use]
pub fn word_overlap_accuracy(response: &str, expected: &str) -> f64 {
    let response_words: HashSet<String> = response
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let expected_words: HashSet<String> = expected
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    if expected_words.is_empty() {
        return 0.0;
    }

    let matches = expected_words.intersection(&response_words).count();
    #[allow(clippy::cast_precision_loss)]
    let accuracy = matches as f64 / expected_words.len() as f64;
    accuracy.min(1.0)
}

/// Estimated USD cost of `tokens` for the given model identifier.
///
/// DeepSeek models are priced per million tokens; everything else uses the
/// OpenAI per-thousand rate.
#[must_use]
pub fn token_cost(model: &str, tokens: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let tokens = tokens as f64;
    if model.starts_with("deepseek") {
        (tokens / 1_000_000.0) * DEEPSEEK_COST_PER_1M_TOKENS
    } else {
        (tokens / 1_000.0) * OPENAI_COST_PER_1K_TOKENS
    }
}

/// Pick the winning model identifier. Side A wins ties.
#[must_use]
pub fn pick_winner<'a>(model_a: &'a str, accuracy_a: f64, model_b: &'a str, accuracy_b: f64) -> &'a str {
    if accuracy_a >= accuracy_b { model_a } else { model_b }
}
