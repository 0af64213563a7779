//! Engine phases, selection outcomes and scheduled continuations.

use crate::puzzle::GroupId;
use serde::{Deserialize, Serialize};

/// Phase of the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Phase {
    /// Fewer than three tiles selected; input accepted.
    Idle,
    /// Three tiles selected and a verdict pending; input locked.
    Evaluating(Verdict),
    /// Every group solved.
    Complete,
}

impl Phase {
    /// Returns true while input is locked.
    pub fn is_locked(&self) -> bool {
        matches!(self, Phase::Evaluating(_))
    }
}

/// Outcome of comparing the three selected tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// All three tiles belong to this group.
    Match(GroupId),
    /// The tiles span at least two groups.
    Mistake,
}

/// Why a selection was ignored.
///
/// These are stale UI events, not programmer errors, so they are reported
/// as values rather than `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum IgnoreReason {
    /// An evaluation is in progress.
    Locked,
    /// The puzzle is already solved.
    Complete,
    /// No tile with that id.
    UnknownTile,
    /// The tile's group has already been found.
    AlreadySolved,
}

/// Result of [`MatchEngine::select_tile`](super::MatchEngine::select_tile).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The tile was toggled; `selected` tiles are now selected.
    Toggled {
        /// Number of selected, unsolved tiles.
        selected: usize,
    },
    /// A third tile was selected; the caller must schedule the continuation.
    Evaluating(Continuation),
}

/// Resolution step scheduled after an artificial delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Step {
    /// Lock a matched group in as solved.
    LockInMatch,
    /// Announce a mistake.
    RevealMistake,
    /// Clear the selection after a mistake.
    ClearMistake,
}

/// A pending step, tagged with the engine generation that produced it.
///
/// Continuations from an earlier generation are discarded on resume, so a
/// reset can never be overwritten by a late timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Continuation {
    pub(super) generation: u64,
    pub(super) step: Step,
}

impl Continuation {
    /// The step to run.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Generation token of the engine that scheduled it.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Fire-once notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A group was found.
    MatchResolved(GroupId),
    /// Three tiles from different groups were selected.
    Mistake,
    /// The last group was found.
    PuzzleComplete,
}
