//! Puzzle round library - find the four groups of three
//!
//! Players see twelve shuffled clue tiles and pick three at a time, looking
//! for the four hidden terms the clues describe.
//!
//! # Architecture
//!
//! - **Puzzle**: groups, tiles and the shuffler
//! - **Review**: editable draft of generated content
//! - **Engine**: the tile-matching state machine
//! - **Session**: timed play on top of the engine (tokio)
//! - **Generator**: clue writing via LLM APIs (OpenAI, Anthropic, Gemini)
//! - **Flow**: setup, generation, review and play stages
//!
//! # Example
//!
//! ```no_run
//! use puzzle_round::{Group, MatchEngine, PuzzleData, Selection};
//!
//! # fn example() -> anyhow::Result<()> {
//! let group = |id: &str, clues: [&str; 3]| Group::new(id, id, clues.map(String::from));
//! let puzzle = PuzzleData::new(
//!     "Capitals".to_string(),
//!     [
//!         group("paris", ["Eiffel", "Seine", "Louvre"]),
//!         group("rome", ["Colosseum", "Tiber", "Vatican"]),
//!         group("berlin", ["Wall", "Spree", "Reichstag"]),
//!         group("madrid", ["Prado", "Retiro", "Real"]),
//!     ],
//! )?;
//!
//! let mut engine = MatchEngine::with_deal(puzzle, &mut rand::rng());
//! engine.select_tile("paris-0");
//! engine.select_tile("paris-1");
//! if let Selection::Evaluating(next) = engine.select_tile("paris-2") {
//!     engine.settle(next);
//! }
//! assert_eq!(engine.solved_groups().len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod engine;
mod flow;
mod generator;
mod llm_client;
mod puzzle;
mod review;
mod session;

/// Terminal presentation layer used by the binary.
pub mod terminal;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmErrorKind, LlmProvider};

// Crate-level exports - Puzzle data
pub use puzzle::{
    CLUES_PER_GROUP, GROUP_COUNT, Group, GroupId, PuzzleData, PuzzleError, TILE_COUNT, TermInput,
    Tile, TileId, deal, shuffle_tiles, shuffled_tiles,
};

// Crate-level exports - Review
pub use review::{ReviewError, ReviewSession};

// Crate-level exports - Engine
pub use engine::invariants::{
    EngineInvariants, Invariant, InvariantSet, InvariantViolation, SelectionBoundedInvariant,
    SolvedConsistentInvariant, TilesPerGroupInvariant,
};
pub use engine::{
    Continuation, EngineEvent, IgnoreReason, MatchEngine, Phase, Selection, Step, Verdict,
};

// Crate-level exports - Play session
pub use session::{PlaySession, Timing};

// Crate-level exports - Content generation
pub use generator::{
    ContentGenerator, GenerationError, GenerationErrorKind, GenerationRequest, InvalidInput,
    LlmGenerator, normalize_response, system_prompt, user_prompt,
};

// Crate-level exports - Application flow
pub use flow::{FlowError, GenerationTicket, PuzzleFlow, Stage};
