//! Tests for building generators from configuration.

use puzzle_round::{GameConfig, GenerationErrorKind, LlmGenerator, LlmProvider};

#[test]
fn test_missing_api_key_is_missing_credential() {
    // SAFETY: no other test in this binary reads the environment.
    unsafe {
        std::env::remove_var(LlmProvider::Anthropic.api_key_var());
    }
    let config = GameConfig::default().with_llm(LlmProvider::Anthropic, "claude-3-5-haiku-20241022");

    let err = LlmGenerator::from_config(&config).unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::MissingCredential);
    assert!(err.message.contains("ANTHROPIC_API_KEY"));
}
