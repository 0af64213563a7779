mod game;
pub mod invariants;
mod phases;

pub use game::MatchEngine;
pub use phases::{Continuation, EngineEvent, IgnoreReason, Phase, Selection, Step, Verdict};
