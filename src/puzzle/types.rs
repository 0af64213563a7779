//! Core domain types for a puzzle round.

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::instrument;

/// Number of groups in every puzzle.
pub const GROUP_COUNT: usize = 4;

/// Number of clues (and therefore tiles) per group.
pub const CLUES_PER_GROUP: usize = 3;

/// Number of tiles on the board.
pub const TILE_COUNT: usize = GROUP_COUNT * CLUES_PER_GROUP;

/// Identifier of a group, unique within one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates a group id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id assigned to the group at `index` of a generated puzzle.
    pub fn for_index(index: usize) -> Self {
        Self(format!("group-{}", index))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One hidden term together with its three clues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group id.
    pub id: GroupId,
    /// The answer players are looking for.
    pub term: String,
    /// Clues shown on the tiles, in tile order.
    pub clues: [String; CLUES_PER_GROUP],
}

impl Group {
    /// Creates a group.
    pub fn new(id: impl Into<GroupId>, term: impl Into<String>, clues: [String; CLUES_PER_GROUP]) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            clues,
        }
    }
}

/// Error building a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PuzzleError {
    /// Two groups share an id.
    #[display("Duplicate group id {}", _0)]
    DuplicateGroupId(#[error(not(source))] GroupId),
    /// Tiles are not one full board of this puzzle's clues.
    #[display("Tiles do not form a board for this puzzle")]
    BoardMismatch,
}

/// A complete puzzle: an optional theme and four groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPuzzle")]
pub struct PuzzleData {
    theme: String,
    groups: [Group; GROUP_COUNT],
}

#[derive(Deserialize)]
struct RawPuzzle {
    #[serde(default)]
    theme: String,
    groups: [Group; GROUP_COUNT],
}

impl TryFrom<RawPuzzle> for PuzzleData {
    type Error = PuzzleError;

    fn try_from(raw: RawPuzzle) -> Result<Self, Self::Error> {
        Self::new(raw.theme, raw.groups)
    }
}

impl PuzzleData {
    /// Creates a puzzle, rejecting duplicate group ids.
    #[instrument(skip(groups))]
    pub fn new(theme: String, groups: [Group; GROUP_COUNT]) -> Result<Self, PuzzleError> {
        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(&group.id) {
                return Err(PuzzleError::DuplicateGroupId(group.id.clone()));
            }
        }
        Ok(Self { theme, groups })
    }

    /// Returns the theme (may be empty).
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Returns the groups in puzzle order.
    pub fn groups(&self) -> &[Group; GROUP_COUNT] {
        &self.groups
    }

    /// Looks up a group by id.
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    // Field-level edits stay crate-private so ids can never be rewritten.
    pub(crate) fn theme_mut(&mut self) -> &mut String {
        &mut self.theme
    }

    pub(crate) fn group_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }
}

/// One term entered by the user before generation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TermInput {
    /// Input slot id.
    pub id: String,
    /// The term; must not be blank.
    pub term: String,
    /// Optional clue suggestions (blank entries are ignored).
    pub user_clues: [String; CLUES_PER_GROUP],
}

impl TermInput {
    /// Creates a term without clue suggestions.
    pub fn new(id: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            user_clues: Default::default(),
        }
    }

    /// Adds clue suggestions, keeping at most three.
    pub fn with_clues<I, S>(mut self, clues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (slot, clue) in self.user_clues.iter_mut().zip(clues) {
            *slot = clue.into();
        }
        self
    }

    /// Clue suggestions that are not blank.
    pub fn suggestions(&self) -> impl Iterator<Item = &str> {
        self.user_clues
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

/// Parses `term[:hint|hint|hint]`. The slot id is left empty.
impl FromStr for TermInput {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (term, hints) = match s.split_once(':') {
            Some((term, hints)) => (term, hints),
            None => (s, ""),
        };
        Ok(Self::new("", term.trim()).with_clues(hints.split('|').map(str::trim)))
    }
}
