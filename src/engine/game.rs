//! Tile-matching state machine.

use super::invariants::{assert_invariants, board_matches};
use super::phases::{Continuation, EngineEvent, IgnoreReason, Phase, Selection, Step, Verdict};
use crate::puzzle::{
    CLUES_PER_GROUP, GROUP_COUNT, GroupId, PuzzleData, PuzzleError, Tile, shuffle_tiles, shuffled_tiles,
};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// Match engine for one confirmed puzzle.
///
/// Holds the authoritative tile and solved-group state. Resolution of a
/// three-tile selection is split into [`Continuation`]s so the caller can
/// insert presentation delays between the steps.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    puzzle: PuzzleData,
    pub(super) tiles: Vec<Tile>,
    pub(super) solved: Vec<GroupId>,
    pub(super) phase: Phase,
    pub(super) pending: Option<Step>,
    generation: u64,
    events: VecDeque<EngineEvent>,
}

impl MatchEngine {
    /// Creates an engine with no tiles dealt yet.
    #[instrument(skip(puzzle), fields(theme = %puzzle.theme()))]
    pub fn new(puzzle: PuzzleData) -> Self {
        Self {
            puzzle,
            tiles: Vec::new(),
            solved: Vec::new(),
            phase: Phase::Idle,
            pending: None,
            generation: 0,
            events: VecDeque::new(),
        }
    }

    /// Creates an engine and deals a shuffled board.
    pub fn with_deal<R: Rng + ?Sized>(puzzle: PuzzleData, rng: &mut R) -> Self {
        let mut engine = Self::new(puzzle);
        engine.deal(rng);
        engine
    }

    /// Discards the current game and deals a freshly shuffled board.
    #[instrument(skip(self, rng))]
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reset();
        self.tiles = shuffled_tiles(&self.puzzle, rng);
        info!(generation = self.generation, "Dealt new board");
        assert_invariants(self);
    }

    /// Installs tiles in a caller-chosen order.
    ///
    /// Used to replay a known board. The tiles must be exactly this puzzle's
    /// twelve clues; otherwise the engine is left untouched. Installed tiles
    /// start unsolved and unselected.
    #[instrument(skip(self, tiles), fields(count = tiles.len()))]
    pub fn deal_tiles(&mut self, mut tiles: Vec<Tile>) -> Result<(), PuzzleError> {
        if !board_matches(&self.puzzle, &tiles) {
            warn!("Rejecting tiles that do not match the puzzle");
            return Err(PuzzleError::BoardMismatch);
        }
        for tile in &mut tiles {
            tile.is_solved = false;
            tile.is_selected = false;
        }
        self.reset();
        self.tiles = tiles;
        assert_invariants(self);
        Ok(())
    }

    /// Reorders the tiles, keeping solved groups and the current selection.
    #[instrument(skip(self, rng))]
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle_tiles(&mut self.tiles, rng);
        debug!("Board reshuffled");
        assert_invariants(self);
    }

    /// Discards tiles, solved groups, pending steps and queued events.
    ///
    /// Any outstanding continuation becomes stale.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.tiles.clear();
        self.solved.clear();
        self.phase = Phase::Idle;
        self.pending = None;
        self.events.clear();
        self.generation += 1;
        debug!(generation = self.generation, "Engine reset");
    }

    /// Toggles a tile's selection.
    ///
    /// Returns [`Selection::Evaluating`] when this was the third selected
    /// tile; the returned continuation must then be resumed (possibly after
    /// a delay) to resolve the verdict.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn select_tile(&mut self, tile_id: &str) -> Selection {
        match self.phase {
            Phase::Evaluating(_) => return self.ignore(IgnoreReason::Locked),
            Phase::Complete => return self.ignore(IgnoreReason::Complete),
            Phase::Idle => {}
        }

        let Some(tile) = self.tiles.iter_mut().find(|t| t.id == *tile_id) else {
            return self.ignore(IgnoreReason::UnknownTile);
        };
        if tile.is_solved {
            return self.ignore(IgnoreReason::AlreadySolved);
        }

        tile.is_selected = !tile.is_selected;
        debug!(tile = %tile.id, selected = tile.is_selected, "Tile toggled");

        let selected = self.selected().count();
        if selected < CLUES_PER_GROUP {
            assert_invariants(self);
            return Selection::Toggled { selected };
        }

        let verdict = self.judge();
        let step = match verdict {
            Verdict::Match(_) => Step::LockInMatch,
            Verdict::Mistake => Step::RevealMistake,
        };
        info!(?verdict, "Three tiles selected");
        self.phase = Phase::Evaluating(verdict);
        assert_invariants(self);
        Selection::Evaluating(self.schedule(step))
    }

    /// Runs one resolution step and returns the next one, if any.
    ///
    /// Stale continuations (from before a reset, or not the step the engine
    /// is waiting for) are discarded without touching any state.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn resume(&mut self, continuation: Continuation) -> Option<Continuation> {
        if continuation.generation != self.generation || self.pending != Some(continuation.step) {
            debug!(?continuation, pending = ?self.pending, "Discarding stale continuation");
            return None;
        }
        self.pending = None;

        let next = match (continuation.step, self.phase.clone()) {
            (Step::LockInMatch, Phase::Evaluating(Verdict::Match(group))) => {
                self.lock_in(group);
                None
            }
            (Step::RevealMistake, Phase::Evaluating(Verdict::Mistake)) => {
                info!("Mistake");
                self.events.push_back(EngineEvent::Mistake);
                Some(self.schedule(Step::ClearMistake))
            }
            (Step::ClearMistake, Phase::Evaluating(Verdict::Mistake)) => {
                for tile in self.tiles.iter_mut().filter(|t| t.is_selected) {
                    tile.is_selected = false;
                }
                self.phase = Phase::Idle;
                None
            }
            (step, phase) => {
                debug!(%step, %phase, "Continuation does not match phase");
                None
            }
        };

        assert_invariants(self);
        next
    }

    /// Runs a continuation and all steps that follow it without delay.
    pub fn settle(&mut self, continuation: Continuation) {
        let mut next = Some(continuation);
        while let Some(continuation) = next {
            next = self.resume(continuation);
        }
    }

    /// Returns true once every group is solved.
    pub fn is_complete(&self) -> bool {
        self.solved.len() == GROUP_COUNT
    }

    /// Tiles in board order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Solved groups in the order they were found.
    pub fn solved_groups(&self) -> &[GroupId] {
        &self.solved
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The puzzle being played.
    pub fn puzzle(&self) -> &PuzzleData {
        &self.puzzle
    }

    /// Generation token; bumped on every reset and deal.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Selected tiles that are still in play.
    pub fn selected(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_pending())
    }

    /// Takes the queued notifications.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    fn ignore(&self, reason: IgnoreReason) -> Selection {
        debug!(%reason, "Selection ignored");
        Selection::Ignored(reason)
    }

    fn schedule(&mut self, step: Step) -> Continuation {
        self.pending = Some(step);
        Continuation {
            generation: self.generation,
            step,
        }
    }

    /// Match is decided by group id only, never by clue text.
    fn judge(&self) -> Verdict {
        let mut selected = self.selected();
        let Some(first) = selected.next() else {
            return Verdict::Mistake;
        };
        if selected.all(|t| t.group_id == first.group_id) {
            Verdict::Match(first.group_id.clone())
        } else {
            Verdict::Mistake
        }
    }

    fn lock_in(&mut self, group: GroupId) {
        for tile in self.tiles.iter_mut().filter(|t| t.group_id == group) {
            tile.is_solved = true;
            tile.is_selected = false;
        }
        info!(group = %group, solved = self.solved.len() + 1, "Group solved");
        self.solved.push(group.clone());
        self.events.push_back(EngineEvent::MatchResolved(group));

        if self.is_complete() {
            info!("Puzzle complete");
            self.phase = Phase::Complete;
            self.events.push_back(EngineEvent::PuzzleComplete);
        } else {
            self.phase = Phase::Idle;
        }
    }
}
