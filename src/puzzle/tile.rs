//! Selectable tiles shown on the board.

use super::types::GroupId;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Tile identifier, `"{group_id}-{clue_index}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    /// Builds the id of the tile showing clue `clue_index` of `group`.
    pub fn for_clue(group: &GroupId, clue_index: usize) -> Self {
        Self(format!("{}-{}", group, clue_index))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for TileId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// One clue on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Tile id.
    pub id: TileId,
    /// Clue text.
    pub text: String,
    /// Group the clue belongs to.
    pub group_id: GroupId,
    /// Whether the tile's group has been found.
    pub is_solved: bool,
    /// Whether the tile is part of the current selection.
    pub is_selected: bool,
}

impl Tile {
    /// Creates an unsolved, unselected tile.
    pub fn new(group_id: GroupId, clue_index: usize, text: impl Into<String>) -> Self {
        Self {
            id: TileId::for_clue(&group_id, clue_index),
            text: text.into(),
            group_id,
            is_solved: false,
            is_selected: false,
        }
    }

    /// Selected and still in play.
    pub fn is_pending(&self) -> bool {
        self.is_selected && !self.is_solved
    }
}
