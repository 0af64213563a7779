//! Content generator boundary.
//!
//! A generator turns a theme and four terms into a complete puzzle. The
//! boundary guarantees exactly four groups of exactly three clues: excess is
//! truncated, shortfalls are errors, nothing is padded.

mod llm;
mod prompt;
mod response;

pub use llm::LlmGenerator;
pub use prompt::{system_prompt, user_prompt};
pub use response::normalize_response;

use crate::puzzle::{GROUP_COUNT, PuzzleData, TermInput};
use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{debug, error, instrument, warn};

/// Source of generated puzzle content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generates a puzzle for a validated request.
    async fn generate(&self, request: &GenerationRequest) -> Result<PuzzleData, GenerationError>;
}

/// Input rejected before it reaches a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum InvalidInput {
    /// A term is empty or whitespace.
    #[display("Term {} is empty", index + 1)]
    EmptyTerm {
        /// Zero-based slot index.
        index: usize,
    },
}

/// A validated generation request: a theme and four non-blank terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    theme: String,
    terms: [TermInput; GROUP_COUNT],
}

impl GenerationRequest {
    /// Validates the terms. The theme may be empty.
    #[instrument(skip_all)]
    pub fn new(theme: impl Into<String>, terms: [TermInput; GROUP_COUNT]) -> Result<Self, InvalidInput> {
        let theme = theme.into();
        if let Some(index) = terms.iter().position(|t| t.term.trim().is_empty()) {
            warn!(index, %theme, "Rejecting request with empty term");
            return Err(InvalidInput::EmptyTerm { index });
        }
        debug!(%theme, "Request validated");
        Ok(Self { theme, terms })
    }

    /// Requested theme, possibly empty.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The four terms.
    pub fn terms(&self) -> &[TermInput; GROUP_COUNT] {
        &self.terms
    }
}

/// Why generation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum GenerationErrorKind {
    /// The service could not be reached or answered with an error.
    Unreachable,
    /// The response could not be turned into a puzzle.
    Malformed,
    /// No API credential is configured.
    MissingCredential,
}

/// Generation failure. Always recoverable by retrying.
#[derive(Debug, Clone, Display, Error)]
#[display("Generation failed ({}): {} at {}:{}", kind, message, file, line)]
pub struct GenerationError {
    /// Failure category.
    pub kind: GenerationErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GenerationError {
    /// Creates a new generation error.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(%kind, error_message = %message, "Generation error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a malformed response.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Malformed, message)
    }
}
