//! Generator backed by a hosted language model.

use super::{
    ContentGenerator, GenerationError, GenerationErrorKind, GenerationRequest, normalize_response,
    system_prompt, user_prompt,
};
use crate::config::GameConfig;
use crate::llm_client::{LlmClient, LlmError, LlmErrorKind};
use crate::puzzle::PuzzleData;
use async_trait::async_trait;
use tracing::{info, instrument};

impl From<LlmError> for GenerationError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        let kind = match err.kind {
            LlmErrorKind::Transport | LlmErrorKind::Api => GenerationErrorKind::Unreachable,
            LlmErrorKind::EmptyResponse => GenerationErrorKind::Malformed,
        };
        Self::new(kind, err.message)
    }
}

/// Writes clues with an [`LlmClient`].
#[derive(Debug, Clone)]
pub struct LlmGenerator {
    client: LlmClient,
    language: String,
}

impl LlmGenerator {
    /// Creates a generator from a client.
    pub fn new(client: LlmClient, language: impl Into<String>) -> Self {
        Self {
            client,
            language: language.into(),
        }
    }

    /// Creates a generator from configuration and the environment.
    ///
    /// A missing API key is reported as
    /// [`GenerationErrorKind::MissingCredential`].
    #[instrument(skip(config))]
    pub fn from_config(config: &GameConfig) -> Result<Self, GenerationError> {
        let llm_config = config
            .create_llm_config()
            .map_err(|e| GenerationError::new(GenerationErrorKind::MissingCredential, e.message))?;
        Ok(Self::new(LlmClient::new(llm_config), config.language().clone()))
    }
}

#[async_trait]
impl ContentGenerator for LlmGenerator {
    #[instrument(skip(self, request), fields(theme = %request.theme()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<PuzzleData, GenerationError> {
        let prompt = user_prompt(request, &self.language);
        let answer = self.client.generate(system_prompt(), &prompt).await?;
        let puzzle = normalize_response(&answer, request.theme())?;
        info!(theme = %puzzle.theme(), "Puzzle generated");
        Ok(puzzle)
    }
}
