//! Pre-play review of generated puzzle content.
//!
//! The review step is a free-form correction surface: any field may be
//! replaced, including with an empty string. Nothing is validated beyond
//! index bounds.

use crate::puzzle::{CLUES_PER_GROUP, GROUP_COUNT, PuzzleData};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Error editing a review draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ReviewError {
    /// No group at this index.
    #[display("Group index {} out of range (puzzle has {} groups)", index, GROUP_COUNT)]
    GroupOutOfRange {
        /// Requested index.
        index: usize,
    },
    /// No clue at this index.
    #[display("Clue index {} out of range (groups have {} clues)", index, CLUES_PER_GROUP)]
    ClueOutOfRange {
        /// Requested index.
        index: usize,
    },
}

/// Mutable working copy of a generated puzzle.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    draft: PuzzleData,
}

impl ReviewSession {
    /// Starts reviewing a puzzle.
    #[instrument(skip(puzzle), fields(theme = %puzzle.theme()))]
    pub fn new(puzzle: PuzzleData) -> Self {
        info!("Starting review");
        Self { draft: puzzle }
    }

    /// Current state of the draft.
    pub fn snapshot(&self) -> &PuzzleData {
        &self.draft
    }

    /// Replaces the theme.
    #[instrument(skip(self, theme))]
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        *self.draft.theme_mut() = theme.into();
        debug!(theme = %self.draft.theme(), "Theme updated");
    }

    /// Replaces the term of the group at `group_index`.
    #[instrument(skip(self, term))]
    pub fn set_term(&mut self, group_index: usize, term: impl Into<String>) -> Result<(), ReviewError> {
        let group = self.draft.group_mut(group_index).ok_or_else(|| {
            warn!(group_index, "Term edit out of range");
            ReviewError::GroupOutOfRange { index: group_index }
        })?;
        group.term = term.into();
        debug!(group_id = %group.id, term = %group.term, "Term updated");
        Ok(())
    }

    /// Replaces a single clue, leaving the group's other clues untouched.
    #[instrument(skip(self, clue))]
    pub fn set_clue(
        &mut self,
        group_index: usize,
        clue_index: usize,
        clue: impl Into<String>,
    ) -> Result<(), ReviewError> {
        let group = self.draft.group_mut(group_index).ok_or_else(|| {
            warn!(group_index, "Clue edit out of range");
            ReviewError::GroupOutOfRange { index: group_index }
        })?;
        let slot = group.clues.get_mut(clue_index).ok_or_else(|| {
            warn!(group_index, clue_index, "Clue edit out of range");
            ReviewError::ClueOutOfRange { index: clue_index }
        })?;
        *slot = clue.into();
        debug!(group_id = %group.id, clue_index, "Clue updated");
        Ok(())
    }

    /// Finalizes the draft as the puzzle to play.
    #[instrument(skip(self))]
    pub fn confirm(self) -> PuzzleData {
        info!(theme = %self.draft.theme(), "Puzzle confirmed");
        self.draft
    }
}
